use axml_fmt::{format_text, script::format_expression};
use std::{env, error::Error, fs};

fn main() -> Result<(), Box<dyn Error>> {
    let file_path = env::args().nth(1).ok_or("missing file path")?;
    let code = fs::read_to_string(file_path)?;

    let formatted = format_text(&code, &Default::default(), format_expression)?;
    print!("{formatted}");
    Ok(())
}
