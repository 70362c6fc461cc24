//! Reading expressions inside `{{ }}` with the swc JavaScript parser,
//! and the default expression formatter.

use crate::{
    ctx::Hints,
    doc::Doc,
    error::{ExpressionParseError, ScriptError},
};
use swc_core::{
    common::{
        BytePos, FileName, SourceMap, Spanned,
        comments::{CommentKind, Comments, SingleThreadedComments},
        sync::Lrc,
    },
    ecma::{
        ast::{EsVersion, Expr, Lit},
        parser::{EsSyntax, Parser, StringInput, Syntax, error::Error, lexer::Lexer},
    },
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ExprKind {
    StringLiteral,
    Other,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Expression {
    pub(crate) kind: ExprKind,
    /// End offset of the comments before the expression, if there're any.
    pub(crate) leading_comments_end: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ObjectLiteral {
    Yes {
        /// End offset of the comments before the first member, if there're any.
        leading_comments_end: Option<usize>,
    },
    No,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Code,
    /// A whole template literal, substitutions included.
    Template,
    LineComment,
    BlockComment,
    Whitespace,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Token<'s> {
    pub(crate) kind: TokenKind,
    pub(crate) text: &'s str,
    pub(crate) start: usize,
}

fn syntax() -> Syntax {
    Syntax::Es(EsSyntax::default())
}

/// A parsed `(<open> code <close>)`.
struct Parsed {
    /// The expression inside the wrapping parentheses.
    expr: Box<Expr>,
    comments: SingleThreadedComments,
    /// Position where the code starts.
    base: u32,
}

impl Parsed {
    fn offset(&self, pos: BytePos) -> usize {
        pos.0.saturating_sub(self.base) as usize
    }

    /// End offset of the comments attached before the token at `pos`.
    fn leading_comments_end(&self, pos: BytePos) -> Option<usize> {
        self.comments
            .get_leading(pos)
            .and_then(|comments| comments.iter().map(|comment| comment.span.hi).max())
            .map(|end| self.offset(end))
    }
}

/// Parse `code` wrapped in `(<open>` and `<close>)`.
///
/// Line breaks are put around the code, so a trailing line comment can't swallow the wrapper.
/// Only a single parenthesized expression spanning the whole input is accepted.
fn parse_wrapped(code: &str, open: &str, close: &str) -> Result<Parsed, ExpressionParseError> {
    let source_map = Lrc::<SourceMap>::default();
    let file = source_map.new_source_file(
        FileName::Anon.into(),
        format!("({open}\n{code}\n{close})"),
    );
    let base = file.start_pos.0 + open.len() as u32 + 2;
    let to_error = |error: Error| ExpressionParseError {
        message: error.kind().msg().into_owned(),
        pos: (error.span().lo.0.saturating_sub(base) as usize).min(code.len()),
    };

    let comments = SingleThreadedComments::default();
    let lexer = Lexer::new(
        syntax(),
        EsVersion::latest(),
        StringInput::from(&*file),
        Some(&comments),
    );
    let mut parser = Parser::new_from(lexer);
    let expr = parser.parse_expr().map_err(to_error)?;
    if let Some(error) = parser.take_errors().into_iter().next() {
        return Err(to_error(error));
    }
    drop(parser);

    match *expr {
        Expr::Paren(paren) if paren.span.hi == file.end_pos => Ok(Parsed {
            expr: paren.expr,
            comments,
            base,
        }),
        expr => Err(ExpressionParseError {
            message: "expect a single expression".into(),
            pos: (expr.span().hi.0.saturating_sub(base) as usize).min(code.len()),
        }),
    }
}

/// Read `code` as a single expression.
pub(crate) fn parse_expression(code: &str) -> Result<Expression, ExpressionParseError> {
    let parsed = parse_wrapped(code, "", "")?;

    let kind = if matches!(&*parsed.expr, Expr::Lit(Lit::Str(..))) {
        ExprKind::StringLiteral
    } else {
        ExprKind::Other
    };
    Ok(Expression {
        kind,
        leading_comments_end: parsed.leading_comments_end(parsed.expr.span_lo()),
    })
}

/// Check whether `({ <code> })` is an object literal.
pub(crate) fn object_literal(code: &str) -> ObjectLiteral {
    let Ok(parsed) = parse_wrapped(code, "{", "}") else {
        return ObjectLiteral::No;
    };
    match &*parsed.expr {
        Expr::Object(object) => ObjectLiteral::Yes {
            leading_comments_end: object
                .props
                .first()
                .and_then(|prop| parsed.leading_comments_end(prop.span_lo())),
        },
        _ => ObjectLiteral::No,
    }
}

/// Split `code` into tokens, comments and whitespace, covering all of it.
///
/// `code` is expected to be parsed already.
pub(crate) fn lex(code: &str) -> Vec<Token<'_>> {
    let source_map = Lrc::<SourceMap>::default();
    let file = source_map.new_source_file(FileName::Anon.into(), code.to_owned());
    let base = file.start_pos.0;
    let offset = |pos: BytePos| pos.0.saturating_sub(base) as usize;

    let comments = SingleThreadedComments::default();
    let lexer = Lexer::new(
        syntax(),
        EsVersion::latest(),
        StringInput::from(&*file),
        Some(&comments),
    );
    let spans = lexer
        .map(|token| (offset(token.span.lo), offset(token.span.hi)))
        .filter(|(start, end)| start < end)
        .collect::<Vec<_>>();

    let mut items = merge_templates(code, spans);
    let (leading, trailing) = comments.take_all();
    for comment in leading
        .borrow()
        .values()
        .chain(trailing.borrow().values())
        .flatten()
    {
        let kind = match comment.kind {
            CommentKind::Line => TokenKind::LineComment,
            CommentKind::Block => TokenKind::BlockComment,
        };
        items.push((kind, offset(comment.span.lo), offset(comment.span.hi)));
    }
    items.sort_by_key(|(_, start, _)| *start);
    items.dedup_by_key(|(_, start, _)| *start);

    let mut tokens = Vec::with_capacity(items.len() * 2);
    let mut pos = 0;
    for (kind, start, end) in items {
        if start > pos {
            tokens.push(Token {
                kind: TokenKind::Whitespace,
                text: &code[pos..start],
                start: pos,
            });
        }
        tokens.push(Token {
            kind,
            text: &code[start..end],
            start,
        });
        pos = end;
    }
    if pos < code.len() {
        tokens.push(Token {
            kind: TokenKind::Whitespace,
            text: &code[pos..],
            start: pos,
        });
    }
    tokens
}

enum Nesting {
    Template,
    Brace,
}

/// Join the pieces of every template literal into one token.
fn merge_templates(code: &str, spans: Vec<(usize, usize)>) -> Vec<(TokenKind, usize, usize)> {
    let mut items = Vec::with_capacity(spans.len());
    let mut spans = spans.into_iter();
    while let Some((start, end)) = spans.next() {
        if &code[start..end] != "`" {
            items.push((TokenKind::Code, start, end));
            continue;
        }

        let mut stack = vec![Nesting::Template];
        let mut end = end;
        while !stack.is_empty() {
            let Some((piece_start, piece_end)) = spans.next() else {
                break;
            };
            end = piece_end;
            match (stack.last(), &code[piece_start..piece_end]) {
                (Some(Nesting::Template), "`") | (Some(Nesting::Brace), "}") => {
                    stack.pop();
                }
                (Some(Nesting::Template), "${") | (Some(Nesting::Brace), "{") => {
                    stack.push(Nesting::Brace);
                }
                (Some(Nesting::Brace), "`") => stack.push(Nesting::Template),
                _ => {}
            }
        }
        items.push((TokenKind::Template, start, end));
    }
    items
}

/// Default expression formatter.
///
/// It keeps tokens and the presence of whitespace between them,
/// while brackets become groups that can break,
/// and commas are followed by a line break or a space.
pub fn format_expression(code: &str, hints: Hints) -> Result<Doc<'static>, ScriptError> {
    parse_expression(code).map_err(ScriptError)?;
    let tokens = lex(code);
    let mut i = 0;
    Ok(Doc::list(format_sequence(&tokens, &mut i, &hints)))
}

fn is_code(token: &Token, texts: &[&str]) -> bool {
    token.kind == TokenKind::Code && texts.contains(&token.text)
}

fn format_sequence(tokens: &[Token], i: &mut usize, hints: &Hints) -> Vec<Doc<'static>> {
    let mut docs = Vec::with_capacity(tokens.len());
    let mut has_space = false;
    while let Some(token) = tokens.get(*i) {
        match token.kind {
            TokenKind::Whitespace => {
                has_space = true;
                *i += 1;
                continue;
            }
            TokenKind::Code if is_code(token, &[")", "]", "}"]) => break,
            TokenKind::Code if token.text == "," => {
                *i += 1;
                let is_trailing = tokens[*i..]
                    .iter()
                    .find(|token| token.kind != TokenKind::Whitespace)
                    .is_none_or(|token| is_code(token, &[")", "]", "}"]));
                if !hints.trailing_comma && is_trailing {
                    continue;
                }
                docs.push(Doc::text(","));
                docs.push(Doc::line());
                has_space = false;
                while tokens
                    .get(*i)
                    .is_some_and(|token| token.kind == TokenKind::Whitespace)
                {
                    *i += 1;
                }
                continue;
            }
            _ => {}
        }

        if has_space && !docs.is_empty() && !matches!(docs.last(), Some(Doc::Line(..))) {
            docs.push(Doc::text(" "));
        }
        has_space = false;

        match token.kind {
            TokenKind::Code if is_code(token, &["(", "[", "{"]) => {
                *i += 1;
                let inner = format_sequence(tokens, i, hints);
                let close = tokens.get(*i).map(|token| token.text).unwrap_or_default();
                *i += 1;
                docs.push(format_bracket(token.text, inner, close, hints));
            }
            TokenKind::LineComment => {
                docs.push(Doc::text(token.text.trim_end().to_owned()));
                docs.push(Doc::hard_line());
                *i += 1;
            }
            _ => {
                docs.push(Doc::text(token.text.to_owned()));
                *i += 1;
            }
        }
    }
    docs
}

fn format_bracket(
    open: &str,
    inner: Vec<Doc<'static>>,
    close: &str,
    hints: &Hints,
) -> Doc<'static> {
    if inner.is_empty() {
        return Doc::text(format!("{open}{close}"));
    }
    let line = if open == "{" && hints.bracket_spacing {
        Doc::line()
    } else {
        Doc::soft_line()
    };
    Doc::text(open.to_owned())
        .append(line.clone().concat(inner).indent())
        .append(line)
        .append(Doc::text(close.to_owned()))
        .group()
}
