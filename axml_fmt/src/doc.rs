//! Layout-independent document tree.
//!
//! Formatting code builds and rewrites [`Doc`] trees;
//! the actual line breaking is left to [`tiny_pretty`].

use std::borrow::Cow;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Doc<'s> {
    Text(Cow<'s, str>),
    Concat(Vec<Doc<'s>>),
    /// Printed on one line if it fits, otherwise all its lines break.
    Group(Box<Doc<'s>>),
    /// Content and separators; each separator breaks only when the next content doesn't fit.
    Fill(Vec<Doc<'s>>),
    Indent(Box<Doc<'s>>),
    Line(LineKind),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineKind {
    /// Nothing when flat.
    Soft,
    /// A space when flat.
    Normal,
    /// Always a line break.
    Hard,
}

impl<'s> Doc<'s> {
    pub fn text(s: impl Into<Cow<'s, str>>) -> Self {
        Doc::Text(s.into())
    }

    pub fn nil() -> Self {
        Doc::Text(Cow::Borrowed(""))
    }

    pub fn list(docs: Vec<Doc<'s>>) -> Self {
        Doc::Concat(docs)
    }

    pub fn fill(docs: Vec<Doc<'s>>) -> Self {
        Doc::Fill(docs)
    }

    pub fn soft_line() -> Self {
        Doc::Line(LineKind::Soft)
    }

    pub fn line() -> Self {
        Doc::Line(LineKind::Normal)
    }

    pub fn hard_line() -> Self {
        Doc::Line(LineKind::Hard)
    }

    pub fn group(self) -> Self {
        Doc::Group(Box::new(self))
    }

    pub fn indent(self) -> Self {
        Doc::Indent(Box::new(self))
    }

    pub fn append(self, other: Doc<'s>) -> Self {
        match self {
            Doc::Concat(mut docs) => {
                docs.push(other);
                Doc::Concat(docs)
            }
            doc => Doc::Concat(vec![doc, other]),
        }
    }

    pub fn concat(self, iter: impl IntoIterator<Item = Doc<'s>>) -> Self {
        match self {
            Doc::Concat(mut docs) => {
                docs.extend(iter);
                Doc::Concat(docs)
            }
            doc => Doc::Concat(std::iter::once(doc).chain(iter).collect()),
        }
    }

    /// Whether this document prints nothing at all.
    pub fn is_nil(&self) -> bool {
        match self {
            Doc::Text(text) => text.is_empty(),
            Doc::Concat(docs) | Doc::Fill(docs) => docs.iter().all(Doc::is_nil),
            Doc::Group(doc) | Doc::Indent(doc) => doc.is_nil(),
            Doc::Line(..) => false,
        }
    }

    pub fn contains_hard_line(&self) -> bool {
        match self {
            Doc::Line(LineKind::Hard) => true,
            Doc::Text(..) | Doc::Line(..) => false,
            Doc::Concat(docs) | Doc::Fill(docs) => docs.iter().any(Doc::contains_hard_line),
            Doc::Group(doc) | Doc::Indent(doc) => doc.contains_hard_line(),
        }
    }

    pub fn into_owned(self) -> Doc<'static> {
        match self {
            Doc::Text(text) => Doc::Text(Cow::Owned(text.into_owned())),
            Doc::Concat(docs) => Doc::Concat(docs.into_iter().map(Doc::into_owned).collect()),
            Doc::Group(doc) => Doc::Group(Box::new(doc.into_owned())),
            Doc::Fill(docs) => Doc::Fill(docs.into_iter().map(Doc::into_owned).collect()),
            Doc::Indent(doc) => Doc::Indent(Box::new(doc.into_owned())),
            Doc::Line(kind) => Doc::Line(kind),
        }
    }

    /// Build a document from code that has been formatted already,
    /// keeping its line breaks.
    pub fn reflow(code: &str) -> Doc<'static> {
        Doc::list(
            itertools::intersperse(
                code.split('\n')
                    .map(|s| Doc::text(s.strip_suffix('\r').unwrap_or(s).to_owned())),
                Doc::hard_line(),
            )
            .collect(),
        )
    }

    /// Convert to the renderer's document.
    ///
    /// Hard lines force every enclosing group to break,
    /// and two hard lines in a row leave one blank line without indentation.
    pub fn to_pretty(&self, indent_width: usize) -> tiny_pretty::Doc<'s> {
        match self {
            Doc::Text(text) if text.is_empty() => tiny_pretty::Doc::nil(),
            Doc::Text(text) => tiny_pretty::Doc::text(text.clone()),
            Doc::Concat(docs) => tiny_pretty::Doc::list(convert_parts(docs, indent_width, false)),
            Doc::Group(doc) => {
                if doc.contains_hard_line() {
                    doc.to_pretty(indent_width)
                } else {
                    doc.to_pretty(indent_width).group()
                }
            }
            Doc::Fill(docs) => tiny_pretty::Doc::list(convert_parts(docs, indent_width, true)),
            Doc::Indent(doc) => doc.to_pretty(indent_width).nest(indent_width),
            Doc::Line(LineKind::Soft) => tiny_pretty::Doc::line_or_nil(),
            Doc::Line(LineKind::Normal) => tiny_pretty::Doc::line_or_space(),
            Doc::Line(LineKind::Hard) => tiny_pretty::Doc::hard_line(),
        }
    }
}

fn convert_parts<'s>(
    docs: &[Doc<'s>],
    indent_width: usize,
    is_fill: bool,
) -> Vec<tiny_pretty::Doc<'s>> {
    docs.iter()
        .enumerate()
        .map(|(i, doc)| match doc {
            Doc::Line(LineKind::Hard)
                if matches!(docs.get(i + 1), Some(Doc::Line(LineKind::Hard))) =>
            {
                tiny_pretty::Doc::empty_line()
            }
            Doc::Line(LineKind::Normal) if is_fill => tiny_pretty::Doc::soft_line(),
            doc => doc.to_pretty(indent_width),
        })
        .collect()
}

impl<'s> From<&'s str> for Doc<'s> {
    fn from(value: &'s str) -> Self {
        Doc::text(value)
    }
}

impl From<String> for Doc<'static> {
    fn from(value: String) -> Self {
        Doc::text(value)
    }
}
