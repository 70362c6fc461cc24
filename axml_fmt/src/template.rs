//! Splitting text and attribute values into literal text and `{{ }}` expressions.

use crate::error::TemplateSyntaxError;
use memchr::memmem;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpanKind {
    Text,
    Expression,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Span<'s> {
    pub kind: SpanKind,
    /// For expressions, the code between `{{` and `}}`.
    pub content: &'s str,
    /// Start of the raw slice, including `{{` for expressions.
    pub start: usize,
    /// End of the raw slice, including `}}` for expressions.
    pub end: usize,
}

/// Split `raw` into spans in source order.
///
/// Nested brackets and string literals are tracked inside expressions,
/// so `{{ {a: {b: 1}} }}` is a single expression.
pub fn tokenize(raw: &str) -> Result<Vec<Span<'_>>, TemplateSyntaxError> {
    let mut spans = vec![];
    let mut pos = 0;
    while let Some(offset) = memmem::find(&raw.as_bytes()[pos..], b"{{") {
        let open = pos + offset;
        if open > pos {
            spans.push(Span {
                kind: SpanKind::Text,
                content: &raw[pos..open],
                start: pos,
                end: open,
            });
        }
        let content_start = open + 2;
        let Some(content_end) = find_expression_end(raw, content_start) else {
            return Err(TemplateSyntaxError { pos: open });
        };
        spans.push(Span {
            kind: SpanKind::Expression,
            content: &raw[content_start..content_end],
            start: open,
            end: content_end + 2,
        });
        pos = content_end + 2;
    }
    if pos < raw.len() {
        spans.push(Span {
            kind: SpanKind::Text,
            content: &raw[pos..],
            start: pos,
            end: raw.len(),
        });
    }
    Ok(spans)
}

/// Like [`tokenize`], but malformed input becomes a single text span.
pub fn tokenize_or_text(raw: &str) -> Vec<Span<'_>> {
    match tokenize(raw) {
        Ok(spans) => spans,
        Err(error) => {
            tracing::debug!(pos = error.pos, "unterminated interpolation, keeping it as text");
            if raw.is_empty() {
                vec![]
            } else {
                vec![Span {
                    kind: SpanKind::Text,
                    content: raw,
                    start: 0,
                    end: raw.len(),
                }]
            }
        }
    }
}

/// Find the `}}` closing an expression whose code starts at `from`.
///
/// Returns the offset of that `}}`.
pub(crate) fn find_expression_end(raw: &str, from: usize) -> Option<usize> {
    let bytes = raw.as_bytes();
    let mut depth = 0usize;
    let mut i = from;
    while let Some(byte) = bytes.get(i) {
        match byte {
            b'\'' | b'"' | b'`' => {
                i = skip_string(bytes, i + 1, *byte)?;
                continue;
            }
            b'{' | b'[' | b'(' => depth += 1,
            b'}' if depth == 0 && bytes.get(i + 1) == Some(&b'}') => return Some(i),
            b'}' | b']' | b')' => depth = depth.saturating_sub(1),
            _ => {}
        }
        i += 1;
    }
    None
}

/// Returns the offset right after the closing quote.
fn skip_string(bytes: &[u8], mut i: usize, quote: u8) -> Option<usize> {
    while let Some(byte) = bytes.get(i) {
        match byte {
            b'\\' => i += 2,
            byte if *byte == quote => return Some(i + 1),
            _ => i += 1,
        }
    }
    None
}
