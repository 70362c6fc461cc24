use axml_fmt::{config::FormatOptions, format_text, script::format_expression};
use std::{env, error::Error, fs, io};

fn main() -> Result<(), Box<dyn Error>> {
    let file_path = env::args().nth(1).ok_or("missing file path")?;
    let code = fs::read_to_string(file_path)?;
    let options = match fs::read_to_string("axml_fmt.toml") {
        Ok(s) => toml::from_str(&s)?,
        Err(error) => {
            if error.kind() == io::ErrorKind::NotFound {
                FormatOptions::default()
            } else {
                return Err(Box::new(error));
            }
        }
    };

    let formatted = format_text(&code, &options, format_expression)?;
    print!("{formatted}");
    Ok(())
}
