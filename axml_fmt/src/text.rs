//! Layout of literal text between interpolations.

use crate::{doc::Doc, helpers};

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Position {
    /// The span is the first one of its text node or attribute value.
    pub(crate) is_first: bool,
    pub(crate) is_last: bool,
}

pub(crate) fn layout_text(text: &str, position: Position, is_attribute: bool) -> Doc<'_> {
    if is_attribute {
        return Doc::text(helpers::squash_whitespace(text));
    }

    if text.bytes().all(|byte| byte.is_ascii_whitespace()) {
        return if is_blank_line(text) {
            Doc::list(vec![Doc::hard_line(), Doc::hard_line()])
        } else {
            Doc::nil()
        };
    }

    let start_trimmed = text.trim_start_matches(|c: char| c.is_ascii_whitespace());
    let leading = &text[..text.len() - start_trimmed.len()];
    let body = start_trimmed.trim_end_matches(|c: char| c.is_ascii_whitespace());
    let trailing = &start_trimmed[body.len()..];

    let mut docs = Vec::with_capacity(3);
    if !position.is_first && !leading.is_empty() {
        push_separator(&mut docs, leading);
    }

    let bytes = body.as_bytes();
    let mut word_start = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_whitespace() {
            let run_start = i;
            while bytes.get(i).is_some_and(u8::is_ascii_whitespace) {
                i += 1;
            }
            docs.push(Doc::text(&body[word_start..run_start]));
            push_separator(&mut docs, &body[run_start..i]);
            word_start = i;
        } else {
            i += 1;
        }
    }
    docs.push(Doc::text(&body[word_start..]));

    if !position.is_last && !trailing.is_empty() {
        push_separator(&mut docs, trailing);
    }
    Doc::fill(docs)
}

fn is_blank_line(whitespace: &str) -> bool {
    whitespace.bytes().filter(|byte| *byte == b'\n').count() >= 2
}

fn push_separator<'s>(docs: &mut Vec<Doc<'s>>, whitespace: &str) {
    if is_blank_line(whitespace) {
        docs.push(Doc::hard_line());
        docs.push(Doc::hard_line());
    } else {
        docs.push(Doc::line());
    }
}
