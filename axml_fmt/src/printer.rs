use crate::{
    ast::*,
    ctx::{Ctx, Hints},
    doc::Doc,
    error::FormatError,
    expr::{self, ExprContext, Rewritten},
    helpers, rewrite,
    state::State,
    template::{self, SpanKind},
    text::{self, Position},
};

pub(super) trait DocGen<'s> {
    fn doc<E, F>(
        &self,
        ctx: &mut Ctx<'_, E, F>,
        state: &State<'s>,
    ) -> Result<Doc<'s>, FormatError<E>>
    where
        F: FnMut(&str, Hints) -> Result<Doc<'static>, E>;
}

impl<'s> DocGen<'s> for Attribute<'s> {
    fn doc<E, F>(
        &self,
        ctx: &mut Ctx<'_, E, F>,
        state: &State<'s>,
    ) -> Result<Doc<'s>, FormatError<E>>
    where
        F: FnMut(&str, Hints) -> Result<Doc<'static>, E>,
    {
        let Some(value) = &self.value else {
            return Ok(Doc::text(self.name));
        };

        let forced_naked = state.current_tag_name.is_some_and(|tag_name| {
            helpers::is_naked_object_candidate(tag_name, self.name, value.raw)
        });
        let value_doc = format_template_text(
            value.raw,
            value.start,
            ExprContext {
                is_attribute: true,
                forced_naked,
            },
            ctx,
        )?;
        // a single-quoted value may contain double quotes
        let quote = if value.quote == Some('\'') && value.raw.contains('"') {
            "'"
        } else {
            "\""
        };

        Ok(Doc::text(self.name)
            .append(Doc::text("="))
            .append(Doc::text(quote))
            .append(value_doc)
            .append(Doc::text(quote)))
    }
}

impl<'s> DocGen<'s> for Comment<'s> {
    fn doc<E, F>(&self, _: &mut Ctx<'_, E, F>, _: &State<'s>) -> Result<Doc<'s>, FormatError<E>>
    where
        F: FnMut(&str, Hints) -> Result<Doc<'static>, E>,
    {
        let content = self.raw.trim();
        if content.is_empty() {
            Ok(Doc::text("<!-- -->"))
        } else {
            Ok(Doc::text("<!-- ")
                .append(Doc::text(content))
                .append(Doc::text(" -->")))
        }
    }
}

impl<'s> DocGen<'s> for Element<'s> {
    fn doc<E, F>(
        &self,
        ctx: &mut Ctx<'_, E, F>,
        state: &State<'s>,
    ) -> Result<Doc<'s>, FormatError<E>>
    where
        F: FnMut(&str, Hints) -> Result<Doc<'static>, E>,
    {
        let has_children = self.children.iter().any(|child| match child {
            Node::Text(text_node) if helpers::is_all_ascii_whitespace(text_node.raw) => {
                text_node.line_breaks >= 2
            }
            Node::Text(text_node) => !prints_nothing(text_node.raw),
            _ => true,
        });
        let inner_state = State {
            current_tag_name: Some(self.tag_name),
            is_root: false,
        };

        let mut docs = Vec::with_capacity(8);
        docs.push(Doc::text("<"));
        docs.push(Doc::text(self.tag_name));

        if !self.attrs.is_empty() {
            let attrs = ctx.nest_with_ctx(|ctx| {
                self.attrs
                    .iter()
                    .map(|attr| attr.doc(ctx, &inner_state).map(|doc| Doc::line().append(doc)))
                    .collect::<Result<Vec<_>, _>>()
            })?;
            let mut attrs = vec![Doc::list(attrs).indent()];
            if has_children && !ctx.options.bracket_same_line {
                attrs.push(Doc::soft_line());
            }
            docs.push(Doc::list(attrs).group());
        }

        if has_children {
            docs.push(Doc::text(">"));

            let last = self.children.len() - 1;
            let mut children = Vec::with_capacity(self.children.len() * 2);
            let mut after_blank_line = false;
            ctx.nest_with_ctx(|ctx| {
                for (i, child) in self.children.iter().enumerate() {
                    match child {
                        Node::Text(text_node)
                            if helpers::is_all_ascii_whitespace(text_node.raw) =>
                        {
                            // blank line at the end is printed before the closing tag
                            if text_node.line_breaks >= 2 && i != last {
                                children.push(Doc::hard_line());
                                children.push(Doc::hard_line());
                                after_blank_line = true;
                            }
                        }
                        Node::Text(text_node) if prints_nothing(text_node.raw) => {}
                        child => {
                            if !after_blank_line {
                                children.push(Doc::soft_line());
                            }
                            after_blank_line = false;
                            children.push(child.doc(ctx, &inner_state)?);
                        }
                    }
                }
                Ok::<_, FormatError<E>>(())
            })?;
            docs.push(Doc::list(children).indent());

            match &self.children[last] {
                Node::Text(text_node)
                    if text_node.line_breaks >= 2
                        && helpers::is_all_ascii_whitespace(text_node.raw) =>
                {
                    docs.push(Doc::hard_line());
                    docs.push(Doc::hard_line());
                }
                _ => docs.push(Doc::soft_line()),
            }
            docs.push(Doc::text("</"));
            docs.push(Doc::text(self.tag_name));
            docs.push(Doc::text(">"));
        } else {
            docs.push(Doc::line());
            docs.push(Doc::text("/>"));
        }

        if state.is_root {
            docs.push(Doc::soft_line());
        }

        Ok(Doc::list(docs).group())
    }
}

impl<'s> DocGen<'s> for Node<'s> {
    fn doc<E, F>(
        &self,
        ctx: &mut Ctx<'_, E, F>,
        state: &State<'s>,
    ) -> Result<Doc<'s>, FormatError<E>>
    where
        F: FnMut(&str, Hints) -> Result<Doc<'static>, E>,
    {
        match self {
            Node::Comment(comment) => comment.doc(ctx, state),
            Node::Element(element) => element.doc(ctx, state),
            Node::Text(text_node) => text_node.doc(ctx, state),
            Node::Directive(directive) => Err(FormatError::UnknownNodeKind {
                kind: "directive",
                pos: directive.start,
            }),
        }
    }
}

impl<'s> DocGen<'s> for Root<'s> {
    fn doc<E, F>(
        &self,
        ctx: &mut Ctx<'_, E, F>,
        state: &State<'s>,
    ) -> Result<Doc<'s>, FormatError<E>>
    where
        F: FnMut(&str, Hints) -> Result<Doc<'static>, E>,
    {
        self.children
            .iter()
            .map(|child| child.doc(ctx, state))
            .collect::<Result<Vec<_>, _>>()
            .map(Doc::list)
    }
}

impl<'s> DocGen<'s> for TextNode<'s> {
    fn doc<E, F>(&self, ctx: &mut Ctx<'_, E, F>, _: &State<'s>) -> Result<Doc<'s>, FormatError<E>>
    where
        F: FnMut(&str, Hints) -> Result<Doc<'static>, E>,
    {
        format_template_text(self.raw, self.start, ExprContext::default(), ctx)
    }
}

/// Text mixed with interpolations, from a text node or an attribute value.
///
/// `base` is the offset of `raw` in the whole source.
fn format_template_text<'s, E, F>(
    raw: &'s str,
    base: usize,
    context: ExprContext,
    ctx: &mut Ctx<'_, E, F>,
) -> Result<Doc<'s>, FormatError<E>>
where
    F: FnMut(&str, Hints) -> Result<Doc<'static>, E>,
{
    if prints_nothing(raw) {
        return Ok(Doc::nil());
    }
    let spans = template::tokenize_or_text(raw);

    let last = spans.len() - 1;
    spans
        .iter()
        .enumerate()
        .map(|(i, span)| match span.kind {
            SpanKind::Text => Ok(text::layout_text(
                span.content,
                Position {
                    is_first: i == 0,
                    is_last: i == last,
                },
                context.is_attribute,
            )),
            SpanKind::Expression => {
                format_interpolation(span.content, base + span.start + 2, context, ctx)
            }
        })
        .collect::<Result<Vec<_>, _>>()
        .map(|docs| Doc::list(docs).group())
}

/// Whether the text or attribute value comes out empty, like `{{}}`.
fn prints_nothing(raw: &str) -> bool {
    match &template::tokenize_or_text(raw)[..] {
        [] => true,
        [span] => span.content.is_empty() || span.content == " ",
        _ => false,
    }
}

fn format_interpolation<'s, E, F>(
    code: &'s str,
    pos: usize,
    context: ExprContext,
    ctx: &mut Ctx<'_, E, F>,
) -> Result<Doc<'s>, FormatError<E>>
where
    F: FnMut(&str, Hints) -> Result<Doc<'static>, E>,
{
    let rewritten = ctx.nest_with_ctx(|ctx| expr::rewrite_expression(code, pos, context, ctx))?;
    Ok(match rewritten {
        Rewritten::Verbatim(doc) => Doc::text("{{").append(doc).append(Doc::text("}}")),
        Rewritten::Formatted(doc) => {
            let spacing = if ctx.options.bracket_spacing {
                Doc::line()
            } else {
                Doc::soft_line()
            };
            // the line ending a trailing line comment must be outside the indentation
            let (doc, ends_with_line_comment) = rewrite::strip_trailing_hard_line(doc);
            let closing = if ends_with_line_comment {
                Doc::hard_line()
            } else {
                spacing.clone()
            };
            Doc::text("{{")
                .append(spacing.append(doc).indent())
                .append(closing)
                .append(Doc::text("}}"))
                .group()
        }
    })
}
