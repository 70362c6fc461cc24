//! Structural rewrites over documents produced by expression formatters.

use crate::doc::{Doc, LineKind};

const TERMINATOR: &str = ";";

/// Remove the statement terminator that an ASI-aware formatter put
/// in front of the code, e.g. `;(a, b)` or `;[1, 2]`.
///
/// Only the first leaf is inspected, so terminators elsewhere are kept.
pub(crate) fn strip_leading_terminator(doc: Doc<'_>) -> Doc<'_> {
    match doc {
        Doc::Text(text) if text == TERMINATOR => Doc::nil(),
        Doc::Concat(docs) => Doc::Concat(map_first(docs, strip_leading_terminator)),
        Doc::Fill(docs) => Doc::Fill(map_first(docs, strip_leading_terminator)),
        Doc::Group(doc) => Doc::Group(Box::new(strip_leading_terminator(*doc))),
        Doc::Indent(doc) => Doc::Indent(Box::new(strip_leading_terminator(*doc))),
        doc @ (Doc::Text(..) | Doc::Line(..)) => doc,
    }
}

fn map_first<'s>(mut docs: Vec<Doc<'s>>, f: impl FnOnce(Doc<'s>) -> Doc<'s>) -> Vec<Doc<'s>> {
    if let Some(first) = docs.first_mut() {
        let doc = std::mem::replace(first, Doc::nil());
        *first = f(doc);
    }
    docs
}

/// Remove one pair of `open`/`close` delimiters wrapping the whole document.
///
/// Delimiters inside the document are never touched:
/// only the outermost first and last parts are candidates.
pub(crate) fn strip_wrapping_delimiters<'s>(doc: Doc<'s>, open: &str, close: &str) -> Doc<'s> {
    match doc {
        Doc::Group(doc) => Doc::Group(Box::new(strip_wrapping_delimiters(*doc, open, close))),
        Doc::Indent(doc) => Doc::Indent(Box::new(strip_wrapping_delimiters(*doc, open, close))),
        Doc::Concat(docs) => Doc::Concat(strip_wrapping_parts(docs, open, close)),
        Doc::Fill(docs) => Doc::Fill(strip_wrapping_parts(docs, open, close)),
        doc @ (Doc::Text(..) | Doc::Line(..)) => doc,
    }
}

fn strip_wrapping_parts<'s>(mut docs: Vec<Doc<'s>>, open: &str, close: &str) -> Vec<Doc<'s>> {
    let is_wrapped = matches!(
        &docs[..],
        [Doc::Text(first), .., Doc::Text(last)] if first == open && last == close
    );
    if docs.len() == 1 {
        docs.into_iter()
            .map(|doc| strip_wrapping_delimiters(doc, open, close))
            .collect()
    } else if is_wrapped {
        docs.pop();
        docs.remove(0);
        docs
    } else if docs.is_empty() {
        docs
    } else {
        let last = docs.len() - 1;
        docs.into_iter()
            .enumerate()
            .map(|(i, doc)| {
                if i == 0 || i == last {
                    strip_wrapping_delimiters(doc, open, close)
                } else {
                    doc
                }
            })
            .collect()
    }
}

/// Remove the indentation introduced by wrapping code in synthetic braces,
/// together with the line breaks that opened and closed it.
pub(crate) fn outdent(doc: Doc<'_>) -> Doc<'_> {
    match doc {
        Doc::Group(doc) => Doc::Group(Box::new(outdent(*doc))),
        Doc::Indent(doc) => trim_edge_lines(*doc),
        Doc::Concat(docs) if docs.len() == 1 => {
            Doc::Concat(docs.into_iter().map(outdent).collect())
        }
        Doc::Concat(docs) => {
            let docs = docs
                .into_iter()
                .flat_map(|doc| match doc {
                    Doc::Indent(doc) => match *doc {
                        Doc::Concat(docs) => docs,
                        doc => vec![doc],
                    },
                    doc => vec![doc],
                })
                .collect();
            trim_edge_lines(Doc::Concat(docs))
        }
        doc @ (Doc::Text(..) | Doc::Fill(..) | Doc::Line(..)) => doc,
    }
}

fn trim_edge_lines(doc: Doc<'_>) -> Doc<'_> {
    match doc {
        Doc::Concat(mut docs) => {
            while matches!(
                docs.last(),
                Some(Doc::Line(LineKind::Soft | LineKind::Normal))
            ) || docs.last().is_some_and(Doc::is_nil)
            {
                docs.pop();
            }
            let leading = docs
                .iter()
                .take_while(|doc| {
                    matches!(doc, Doc::Line(LineKind::Soft | LineKind::Normal)) || doc.is_nil()
                })
                .count();
            docs.drain(..leading);
            Doc::Concat(docs)
        }
        doc => doc,
    }
}

/// Flatten nested concatenations and merge adjacent text.
///
/// Running it on its own output changes nothing.
pub(crate) fn normalize(doc: Doc<'_>) -> Doc<'_> {
    match doc {
        Doc::Concat(docs) => Doc::Concat(normalize_parts(docs)),
        Doc::Fill(docs) => Doc::Fill(normalize_parts(docs)),
        Doc::Group(doc) => Doc::Group(Box::new(normalize(*doc))),
        Doc::Indent(doc) => Doc::Indent(Box::new(normalize(*doc))),
        doc @ (Doc::Text(..) | Doc::Line(..)) => doc,
    }
}

fn normalize_parts(docs: Vec<Doc<'_>>) -> Vec<Doc<'_>> {
    let mut parts = Vec::with_capacity(docs.len());
    flatten_into(docs, &mut parts);
    parts
}

fn flatten_into<'s>(docs: Vec<Doc<'s>>, parts: &mut Vec<Doc<'s>>) {
    for doc in docs {
        match normalize(doc) {
            Doc::Concat(docs) => flatten_into(docs, parts),
            Doc::Text(text) => match parts.last_mut() {
                Some(Doc::Text(prev)) => {
                    if !text.is_empty() {
                        prev.to_mut().push_str(&text);
                    }
                }
                _ => parts.push(Doc::Text(text)),
            },
            doc => parts.push(doc),
        }
    }
}

/// Remove the hard line break ending the document, as left by a trailing line comment.
///
/// The second value tells whether one was removed.
pub(crate) fn strip_trailing_hard_line(doc: Doc<'_>) -> (Doc<'_>, bool) {
    match doc {
        Doc::Line(LineKind::Hard) => (Doc::nil(), true),
        Doc::Concat(docs) => {
            let (docs, stripped) = strip_last_hard_line(docs);
            (Doc::Concat(docs), stripped)
        }
        Doc::Fill(docs) => {
            let (docs, stripped) = strip_last_hard_line(docs);
            (Doc::Fill(docs), stripped)
        }
        Doc::Group(doc) => {
            let (doc, stripped) = strip_trailing_hard_line(*doc);
            (doc.group(), stripped)
        }
        Doc::Indent(doc) => {
            let (doc, stripped) = strip_trailing_hard_line(*doc);
            (doc.indent(), stripped)
        }
        doc @ (Doc::Text(..) | Doc::Line(..)) => (doc, false),
    }
}

fn strip_last_hard_line(mut docs: Vec<Doc<'_>>) -> (Vec<Doc<'_>>, bool) {
    while docs.last().is_some_and(Doc::is_nil) {
        docs.pop();
    }
    match docs.pop() {
        Some(last) => {
            let (last, stripped) = strip_trailing_hard_line(last);
            docs.push(last);
            (docs, stripped)
        }
        None => (docs, false),
    }
}
