#![doc = include_str!("../README.md")]

mod ast;
pub mod config;
mod ctx;
pub mod doc;
mod error;
mod expr;
mod helpers;
mod parser;
mod printer;
mod rewrite;
pub mod script;
mod state;
pub mod template;
mod text;

use crate::{
    config::FormatOptions, ctx::Ctx, doc::Doc, parser::Parser, printer::DocGen, state::State,
};
pub use crate::{ctx::Hints, error::*};
use tiny_pretty::{IndentKind, PrintOptions};

/// Format the given source code.
///
/// Expressions inside `{{ }}` are formatted by the given expression formatter.
/// [`script::format_expression`] is a built-in one which can be used directly.
///
/// ```
/// use axml_fmt::{format_text, script::format_expression};
///
/// let code = r#"
/// <view class="{{ active ? 'on' : 'off' }}">
///   <text>Hello, {{ user.name }}!</text>
/// </view>"#;
///
/// let formatted = format_text(code, &Default::default(), format_expression).unwrap();
/// ```
///
/// For the expression formatter closure,
///
/// - The first argument is code that needs formatting.
/// - The second argument is hints which contains useful information for expression formatters,
///   such as print width and whether the code is an object literal with synthetic braces.
pub fn format_text<E, F>(
    code: &str,
    options: &FormatOptions,
    external_formatter: F,
) -> Result<String, FormatError<E>>
where
    F: FnMut(&str, Hints) -> Result<Doc<'static>, E>,
{
    let mut parser = Parser::new(code);
    let ast = parser.parse_root().map_err(FormatError::Syntax)?;

    let mut ctx = Ctx {
        indent_width: options.layout.indent_width,
        print_width: options.layout.print_width,
        options: &options.language,
        indent_level: 0,
        external_formatter,
    };

    let doc = ast.doc(
        &mut ctx,
        &State {
            current_tag_name: None,
            is_root: true,
        },
    )?;

    let formatted = tiny_pretty::print(
        &doc.to_pretty(options.layout.indent_width),
        &PrintOptions {
            indent_kind: if options.layout.use_tabs {
                IndentKind::Tab
            } else {
                IndentKind::Space
            },
            line_break: options.layout.line_break.clone().into(),
            width: options.layout.print_width,
            tab_size: options.layout.indent_width,
        },
    );

    let mut formatted = formatted.trim_end().to_owned();
    formatted.push_str(options.layout.line_break.as_str());
    Ok(formatted)
}
