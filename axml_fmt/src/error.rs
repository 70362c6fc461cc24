use std::{borrow::Cow, error::Error, fmt};

#[derive(Clone, Debug)]
/// Syntax error when parsing tags.
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub pos: usize,
}

#[derive(Clone, Debug)]
pub enum SyntaxErrorKind {
    ExpectAttrName,
    ExpectAttrValue,
    ExpectChar(char),
    ExpectCloseTag,
    ExpectComment,
    ExpectDirective,
    ExpectElement,
    ExpectSelfCloseTag,
    ExpectTagName,
    ExpectTextNode,
    UnexpectedCloseTag,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason: Cow<_> = match self.kind {
            SyntaxErrorKind::ExpectAttrName => "expect attribute name".into(),
            SyntaxErrorKind::ExpectAttrValue => "expect attribute value".into(),
            SyntaxErrorKind::ExpectChar(c) => format!("expect char '{c}'").into(),
            SyntaxErrorKind::ExpectCloseTag => "expect close tag".into(),
            SyntaxErrorKind::ExpectComment => "expect comment".into(),
            SyntaxErrorKind::ExpectDirective => "expect directive".into(),
            SyntaxErrorKind::ExpectElement => "expect element".into(),
            SyntaxErrorKind::ExpectSelfCloseTag => "expect self close tag".into(),
            SyntaxErrorKind::ExpectTagName => "expect tag name".into(),
            SyntaxErrorKind::ExpectTextNode => "expect text node".into(),
            SyntaxErrorKind::UnexpectedCloseTag => "unexpected close tag".into(),
        };

        write!(f, "syntax error '{reason}' at position {}", self.pos)
    }
}

impl Error for SyntaxError {}

#[derive(Clone, Debug, PartialEq, Eq)]
/// An opening `{{` without matching `}}`.
///
/// This is always recovered from by treating the whole string as text.
pub struct TemplateSyntaxError {
    /// Offset of the unterminated `{{`.
    pub pos: usize,
}

impl fmt::Display for TemplateSyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unterminated `{{{{` at position {}", self.pos)
    }
}

impl Error for TemplateSyntaxError {}

#[derive(Clone, Debug, PartialEq, Eq)]
/// The code inside `{{ }}` can't be read as an expression.
///
/// This is recovered from by printing the expression as is.
pub struct ExpressionParseError {
    /// Message reported by the JavaScript parser.
    pub message: String,
    /// Offset in the expression code.
    pub pos: usize,
}

impl fmt::Display for ExpressionParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "expression error '{}' at position {}",
            self.message, self.pos
        )
    }
}

impl Error for ExpressionParseError {}

#[derive(Clone, Debug)]
/// Error from the built-in expression formatter,
/// returned when the code given to it isn't a well-formed expression.
pub struct ScriptError(pub ExpressionParseError);

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to format expression: {}", self.0)
    }
}

impl Error for ScriptError {}

#[derive(Debug)]
/// The error type for axml_fmt.
pub enum FormatError<E> {
    /// Syntax error when parsing tags.
    Syntax(SyntaxError),
    /// Error from external formatter when formatting an expression.
    /// It carries the code sent to the formatter and its position in source.
    External(E, String, usize),
    /// The tree contains a node that can't be printed.
    UnknownNodeKind { kind: &'static str, pos: usize },
}

impl<E> fmt::Display for FormatError<E>
where
    E: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::Syntax(e) => e.fmt(f),
            FormatError::External(e, code, pos) => write!(
                f,
                "failed to format expression at position {pos} with external formatter: `{code}`:\n{e}"
            ),
            FormatError::UnknownNodeKind { kind, pos } => {
                write!(f, "unknown node kind '{kind}' at position {pos}")
            }
        }
    }
}

impl<E> Error for FormatError<E> where E: Error {}
