use crate::{config::LanguageOptions, doc::Doc, error::FormatError};

#[derive(Clone, Debug, PartialEq, Eq)]
/// Hints provided to the expression formatter.
pub struct Hints {
    /// Print width left for the expression, excluding current indentation.
    pub print_width: usize,
    pub indent_width: usize,
    /// Print spaces inside `{` and `}` of object literals.
    pub bracket_spacing: bool,
    /// Whether statements end with semicolons. Always `false`.
    pub semicolons: bool,
    /// Whether multi-line literals end with a trailing comma. Always `false`.
    pub trailing_comma: bool,
    /// The code is an object literal whose braces were added by us.
    pub naked_object: bool,
}

pub(crate) struct Ctx<'b, E, F>
where
    F: FnMut(&str, Hints) -> Result<Doc<'static>, E>,
{
    pub(crate) indent_width: usize,
    pub(crate) print_width: usize,
    pub(crate) options: &'b LanguageOptions,
    pub(crate) indent_level: usize,
    pub(crate) external_formatter: F,
}

impl<'b, E, F> Ctx<'b, E, F>
where
    F: FnMut(&str, Hints) -> Result<Doc<'static>, E>,
{
    pub(crate) fn format_with_external_formatter(
        &mut self,
        code: &str,
        naked_object: bool,
        pos: usize,
    ) -> Result<Doc<'static>, FormatError<E>> {
        let hints = Hints {
            print_width: self.print_width.saturating_sub(self.indent_level),
            indent_width: self.indent_width,
            bracket_spacing: self.options.bracket_spacing,
            semicolons: false,
            trailing_comma: false,
            naked_object,
        };
        (self.external_formatter)(code, hints)
            .map_err(|error| FormatError::External(error, code.to_owned(), pos))
    }

    /// Run `f` one indentation level deeper,
    /// so formatters invoked inside see less print width.
    pub(crate) fn nest_with_ctx<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.indent_level += self.indent_width;
        let result = f(self);
        self.indent_level -= self.indent_width;
        result
    }
}
