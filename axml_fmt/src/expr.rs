//! Formatting the code of a single `{{ }}` interpolation.

use crate::{
    ctx::{Ctx, Hints},
    doc::Doc,
    error::FormatError,
    rewrite,
    script::{self, ExprKind, Expression, ObjectLiteral},
};

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct ExprContext {
    pub(crate) is_attribute: bool,
    /// The attribute is conventionally written as an object literal without braces.
    pub(crate) forced_naked: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Rewritten<'s> {
    /// Printed as is, hugging the `{{` and `}}`.
    Verbatim(Doc<'s>),
    Formatted(Doc<'s>),
}

/// `pos` is the offset of `code` in the whole source.
pub(crate) fn rewrite_expression<'s, E, F>(
    code: &'s str,
    pos: usize,
    context: ExprContext,
    ctx: &mut Ctx<'_, E, F>,
) -> Result<Rewritten<'s>, FormatError<E>>
where
    F: FnMut(&str, Hints) -> Result<Doc<'static>, E>,
{
    let pos = pos + (code.len() - code.trim_start().len());
    let code = code.trim();
    if code.is_empty() {
        return Ok(Rewritten::Formatted(Doc::nil()));
    }

    // a naked object like `a: 1, b: 2` is no expression without its braces
    let naked_object = if context.is_attribute && context.forced_naked {
        match script::object_literal(code) {
            ObjectLiteral::Yes {
                leading_comments_end,
            } => Some(Expression {
                kind: ExprKind::Other,
                leading_comments_end,
            }),
            ObjectLiteral::No => {
                tracing::debug!(pos, "attribute value isn't an object literal");
                None
            }
        }
    } else {
        None
    };
    let naked = naked_object.is_some();

    let expr = match naked_object.map_or_else(|| script::parse_expression(code), Ok) {
        Ok(expr) => expr,
        Err(error) => {
            tracing::debug!(
                pos = pos + error.pos,
                %error,
                "failed to parse expression, printing it as is"
            );
            return Ok(Rewritten::Formatted(Doc::text(code)));
        }
    };

    if expr.kind == ExprKind::StringLiteral {
        return Ok(Rewritten::Verbatim(if ctx.options.bracket_spacing {
            Doc::text(format!(" {code} "))
        } else {
            Doc::text(code)
        }));
    }

    let (comments, code, pos) = match expr.leading_comments_end {
        Some(end) => {
            let rest = &code[end..];
            let skipped = rest.len() - rest.trim_start().len();
            (
                format_comments(&code[..end]),
                rest.trim_start(),
                pos + end + skipped,
            )
        }
        None => (vec![], code, pos),
    };

    let doc = if naked {
        let doc = ctx.format_with_external_formatter(&format!("{{{code}}}"), true, pos)?;
        let doc = rewrite::strip_wrapping_delimiters(doc, "(", ")");
        let doc = rewrite::strip_wrapping_delimiters(doc, "{", "}");
        rewrite::outdent(doc)
    } else {
        let doc = ctx.format_with_external_formatter(code, false, pos)?;
        rewrite::strip_leading_terminator(doc)
    };
    let doc = rewrite::normalize(doc);

    if comments.is_empty() {
        Ok(Rewritten::Formatted(doc))
    } else {
        Ok(Rewritten::Formatted(Doc::list(comments).append(doc)))
    }
}

/// Every trimmed line of comments is followed by a line break.
fn format_comments(comments: &str) -> Vec<Doc<'_>> {
    comments
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .flat_map(|line| [Doc::text(line), Doc::hard_line()])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::LanguageOptions, error::ScriptError};

    fn rewrite(
        code: &str,
        context: ExprContext,
        options: &LanguageOptions,
    ) -> Result<Rewritten<'static>, FormatError<ScriptError>> {
        let mut ctx = Ctx {
            indent_width: 2,
            print_width: 80,
            options,
            indent_level: 0,
            external_formatter: script::format_expression,
        };
        rewrite_expression(code, 0, context, &mut ctx).map(|rewritten| match rewritten {
            Rewritten::Verbatim(doc) => Rewritten::Verbatim(doc.into_owned()),
            Rewritten::Formatted(doc) => Rewritten::Formatted(doc.into_owned()),
        })
    }

    const ATTR_NAKED: ExprContext = ExprContext {
        is_attribute: true,
        forced_naked: true,
    };

    #[test]
    fn empty_code() {
        assert_eq!(
            rewrite("  ", ExprContext::default(), &LanguageOptions::default()).unwrap(),
            Rewritten::Formatted(Doc::nil())
        );
    }

    #[test]
    fn unparsable_code_is_kept() {
        assert_eq!(
            rewrite(" a +* ( ", ExprContext::default(), &LanguageOptions::default()).unwrap(),
            Rewritten::Formatted(Doc::text("a +* ("))
        );
    }

    #[test]
    fn string_literal_is_verbatim() {
        assert_eq!(
            rewrite(" 'hello' ", ExprContext::default(), &LanguageOptions::default()).unwrap(),
            Rewritten::Verbatim(Doc::text("'hello'"))
        );
        let options = LanguageOptions {
            bracket_spacing: true,
            ..Default::default()
        };
        assert_eq!(
            rewrite("\"hello\"", ExprContext::default(), &options).unwrap(),
            Rewritten::Verbatim(Doc::text(" \"hello\" "))
        );
    }

    #[test]
    fn plain_expression() {
        assert_eq!(
            rewrite(" a + b ", ExprContext::default(), &LanguageOptions::default()).unwrap(),
            Rewritten::Formatted(Doc::list(vec![Doc::text("a + b")]))
        );
    }

    #[test]
    fn naked_object() {
        assert_eq!(
            rewrite("a: 1, b: 2", ATTR_NAKED, &LanguageOptions::default()).unwrap(),
            Rewritten::Formatted(Doc::list(vec![
                Doc::list(vec![Doc::text("a: 1,"), Doc::line(), Doc::text("b: 2")]).group()
            ]))
        );
    }

    #[test]
    fn naked_candidate_not_object() {
        assert_eq!(
            rewrite("a ? b : c", ATTR_NAKED, &LanguageOptions::default()).unwrap(),
            Rewritten::Formatted(Doc::list(vec![Doc::text("a ? b : c")]))
        );
    }

    #[test]
    fn naked_check_skipped_for_text() {
        let context = ExprContext {
            is_attribute: false,
            forced_naked: true,
        };
        assert_eq!(
            rewrite("a: 1", context, &LanguageOptions::default()).unwrap(),
            Rewritten::Formatted(Doc::text("a: 1"))
        );
    }

    #[test]
    fn leading_comments_are_hoisted() {
        assert_eq!(
            rewrite(" /* note */ x + 1 ", ExprContext::default(), &LanguageOptions::default())
                .unwrap(),
            Rewritten::Formatted(Doc::list(vec![
                Doc::text("/* note */"),
                Doc::hard_line(),
                Doc::list(vec![Doc::text("x + 1")]),
            ]))
        );
    }

    #[test]
    fn naked_object_with_leading_comment() {
        assert_eq!(
            rewrite("/* c */ a: 1", ATTR_NAKED, &LanguageOptions::default()).unwrap(),
            Rewritten::Formatted(Doc::list(vec![
                Doc::text("/* c */"),
                Doc::hard_line(),
                Doc::list(vec![Doc::list(vec![Doc::text("a: 1")]).group()]),
            ]))
        );
    }

    #[test]
    fn unparsable_code_skips_formatter() {
        let options = LanguageOptions::default();
        let mut ctx = Ctx {
            indent_width: 2,
            print_width: 80,
            options: &options,
            indent_level: 0,
            external_formatter: |_: &str, _: Hints| Err::<Doc<'static>, _>("boom"),
        };
        for code in ["a b", "a +* b", "let x = 1", "a => => b"] {
            assert_eq!(
                rewrite_expression(code, 0, ExprContext::default(), &mut ctx).unwrap(),
                Rewritten::Formatted(Doc::text(code))
            );
        }
    }

    #[test]
    fn formatter_failure_is_fatal() {
        let options = LanguageOptions::default();
        let mut ctx = Ctx {
            indent_width: 2,
            print_width: 80,
            options: &options,
            indent_level: 0,
            external_formatter: |_: &str, _: Hints| Err::<Doc<'static>, _>("boom"),
        };
        match rewrite_expression(" a + b", 10, ExprContext::default(), &mut ctx) {
            Err(FormatError::External(error, code, pos)) => {
                assert_eq!(error, "boom");
                assert_eq!(code, "a + b");
                assert_eq!(pos, 11);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
