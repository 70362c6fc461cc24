use axml_fmt::{config::FormatOptions, format_text, script::format_expression};
use insta::{assert_snapshot, glob, Settings};
use std::{fs, path::Path};

#[test]
fn fmt_snapshot() {
    glob!("fmt/**/*.axml", |path| {
        let input = fs::read_to_string(path).unwrap();
        let options = load_options(path);

        let output = run_format_test(path, &input, &options);
        build_settings(path).bind(|| {
            let name = path.file_stem().unwrap().to_str().unwrap();
            assert_snapshot!(name, output);
        });
    });
}

/// Options come from a `.toml` file next to the fixture, if any.
fn load_options(path: &Path) -> FormatOptions {
    fs::read_to_string(path.with_extension("toml"))
        .map(|config_file| toml::from_str::<FormatOptions>(&config_file).unwrap())
        .unwrap_or_default()
}

fn run_format_test(path: &Path, input: &str, options: &FormatOptions) -> String {
    let output = format_text(input, options, format_expression)
        .map_err(|err| format!("failed to format '{}': {:?}", path.display(), err))
        .unwrap();
    assert!(
        output.ends_with('\n'),
        "'{}' output should end with a line break",
        path.display()
    );

    let regression_format = format_text(&output, options, format_expression)
        .map_err(|err| {
            format!(
                "syntax error in stability test '{}': {:?}",
                path.display(),
                err
            )
        })
        .unwrap();
    similar_asserts::assert_eq!(
        output,
        regression_format,
        "'{}' format is unstable",
        path.display()
    );

    output
}

fn build_settings(path: &Path) -> Settings {
    let mut settings = Settings::clone_current();
    settings.set_snapshot_path(path.parent().unwrap());
    settings.remove_snapshot_suffix();
    settings.set_prepend_module_to_snapshot(false);
    settings.remove_input_file();
    settings.set_omit_expression(true);
    settings.remove_info();
    settings
}
