pub struct Attribute<'s> {
    pub name: &'s str,
    /// `None` means the attribute is present without value.
    pub value: Option<AttrValue<'s>>,
}

pub struct AttrValue<'s> {
    /// Raw text between quotes, without entity decoding.
    pub raw: &'s str,
    pub start: usize,
    /// `None` for unquoted values.
    pub quote: Option<char>,
}

pub struct Comment<'s> {
    pub raw: &'s str,
}

/// `<!DOCTYPE ...>`, `<?xml ...?>` or `<![CDATA[...]]>`.
pub struct Directive {
    pub start: usize,
}

pub struct Element<'s> {
    pub tag_name: &'s str,
    pub attrs: Vec<Attribute<'s>>,
    pub children: Vec<Node<'s>>,
}

pub enum Node<'s> {
    Comment(Comment<'s>),
    Directive(Directive),
    Element(Element<'s>),
    Text(TextNode<'s>),
}

pub struct Root<'s> {
    pub children: Vec<Node<'s>>,
}

pub struct TextNode<'s> {
    pub raw: &'s str,
    pub start: usize,
    pub line_breaks: usize,
}
