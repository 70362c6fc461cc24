//! This parser is designed for internal use,
//! not generating general-purpose AST.
//!
//! It consumes string then produces AST directly without tokenizing,
//! and it only reads the XML flavor used by AXML templates:
//! every element can be self-closed and there're no void or raw text elements.

use crate::{
    ast::*,
    error::{SyntaxError, SyntaxErrorKind},
    template,
};
use std::{iter::Peekable, str::CharIndices};

pub struct Parser<'s> {
    source: &'s str,
    chars: Peekable<CharIndices<'s>>,
}

impl<'s> Parser<'s> {
    pub fn new(source: &'s str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
        }
    }

    fn try_parse<F, R>(&mut self, f: F) -> PResult<R>
    where
        F: FnOnce(&mut Self) -> PResult<R>,
    {
        let chars = self.chars.clone();
        let result = f(self);
        if result.is_err() {
            self.chars = chars;
        }
        result
    }

    fn current_pos(&mut self) -> usize {
        self.chars
            .peek()
            .map(|(pos, _)| *pos)
            .unwrap_or(self.source.len())
    }

    fn emit_error(&mut self, kind: SyntaxErrorKind) -> SyntaxError {
        SyntaxError {
            kind,
            pos: self.current_pos(),
        }
    }

    fn skip_ws(&mut self) {
        while self
            .chars
            .next_if(|(_, c)| c.is_ascii_whitespace())
            .is_some()
        {}
    }

    fn parse_attr(&mut self) -> PResult<Attribute<'s>> {
        let name = self.parse_attr_name()?;
        self.skip_ws();
        let value = if self.chars.next_if(|(_, c)| *c == '=').is_some() {
            self.skip_ws();
            Some(self.parse_attr_value()?)
        } else {
            None
        };
        Ok(Attribute { name, value })
    }

    fn parse_attr_name(&mut self) -> PResult<&'s str> {
        let Some((start, _)) = self.chars.next_if(|(_, c)| is_attr_name_char(*c)) else {
            return Err(self.emit_error(SyntaxErrorKind::ExpectAttrName));
        };
        while self.chars.next_if(|(_, c)| is_attr_name_char(*c)).is_some() {}
        let end = self.current_pos();
        Ok(&self.source[start..end])
    }

    fn parse_attr_value(&mut self) -> PResult<AttrValue<'s>> {
        let quote = self.chars.next_if(|(_, c)| *c == '"' || *c == '\'');

        if let Some((start, quote)) = quote {
            let start = start + 1;
            loop {
                match self.chars.next() {
                    Some((end, c)) if c == quote => {
                        return Ok(AttrValue {
                            raw: &self.source[start..end],
                            start,
                            quote: Some(quote),
                        });
                    }
                    Some(..) => continue,
                    None => return Err(self.emit_error(SyntaxErrorKind::ExpectChar(quote))),
                }
            }
        } else {
            fn is_unquoted_attr_value_char(c: char) -> bool {
                !c.is_ascii_whitespace() && !matches!(c, '"' | '\'' | '=' | '<' | '>' | '`')
            }

            let Some((start, _)) = self.chars.next_if(|(_, c)| is_unquoted_attr_value_char(*c))
            else {
                return Err(self.emit_error(SyntaxErrorKind::ExpectAttrValue));
            };
            while self
                .chars
                .next_if(|(_, c)| is_unquoted_attr_value_char(*c))
                .is_some()
            {}
            let end = self.current_pos();
            Ok(AttrValue {
                raw: &self.source[start..end],
                start,
                quote: None,
            })
        }
    }

    fn parse_comment(&mut self) -> PResult<Comment<'s>> {
        let Some((start, _)) = self.chars.next_if(|(_, c)| *c == '<') else {
            return Err(self.emit_error(SyntaxErrorKind::ExpectComment));
        };
        if self
            .chars
            .next_if(|(_, c)| *c == '!')
            .and_then(|_| self.chars.next_if(|(_, c)| *c == '-'))
            .and_then(|_| self.chars.next_if(|(_, c)| *c == '-'))
            .is_none()
        {
            return Err(self.emit_error(SyntaxErrorKind::ExpectComment));
        }
        let content_start = start + 4;

        loop {
            match self.chars.next() {
                Some((i, '-')) => {
                    let mut chars = self.chars.clone();
                    if chars
                        .next_if(|(_, c)| *c == '-')
                        .and_then(|_| chars.next_if(|(_, c)| *c == '>'))
                        .is_some()
                    {
                        self.chars = chars;
                        return Ok(Comment {
                            raw: &self.source[content_start..i],
                        });
                    }
                }
                Some(..) => continue,
                None => return Err(self.emit_error(SyntaxErrorKind::ExpectComment)),
            }
        }
    }

    fn parse_directive(&mut self) -> PResult<Directive> {
        let Some((start, _)) = self.chars.next_if(|(_, c)| *c == '<') else {
            return Err(self.emit_error(SyntaxErrorKind::ExpectDirective));
        };
        let terminator = if self.source[start..].starts_with("<![CDATA[") {
            "]]>"
        } else if self.source[start..].starts_with("<?") {
            "?>"
        } else if self.source[start..].starts_with("<!") {
            ">"
        } else {
            return Err(self.emit_error(SyntaxErrorKind::ExpectDirective));
        };

        let Some(offset) = memchr::memmem::find(
            &self.source.as_bytes()[start + 2..],
            terminator.as_bytes(),
        ) else {
            return Err(self.emit_error(SyntaxErrorKind::ExpectDirective));
        };
        let end = start + 2 + offset + terminator.len();
        while self.chars.next_if(|(i, _)| *i < end).is_some() {}
        Ok(Directive { start })
    }

    fn parse_element(&mut self) -> PResult<Element<'s>> {
        if self.chars.next_if(|(_, c)| *c == '<').is_none() {
            return Err(self.emit_error(SyntaxErrorKind::ExpectElement));
        }
        let tag_name = self.parse_tag_name()?;

        let mut attrs = vec![];
        loop {
            self.skip_ws();
            match self.chars.peek() {
                Some((_, '/')) => {
                    self.chars.next();
                    if self.chars.next_if(|(_, c)| *c == '>').is_some() {
                        return Ok(Element {
                            tag_name,
                            attrs,
                            children: vec![],
                        });
                    } else {
                        return Err(self.emit_error(SyntaxErrorKind::ExpectSelfCloseTag));
                    }
                }
                Some((_, '>')) => {
                    self.chars.next();
                    break;
                }
                _ => {
                    attrs.push(self.parse_attr()?);
                }
            }
        }

        let mut children = vec![];
        loop {
            match self.chars.peek() {
                Some((_, '<')) => {
                    let mut chars = self.chars.clone();
                    chars.next();
                    if let Some((pos, _)) = chars.next_if(|(_, c)| *c == '/') {
                        self.chars = chars;
                        let close_tag_name = self.parse_tag_name()?;
                        if close_tag_name != tag_name {
                            return Err(SyntaxError {
                                kind: SyntaxErrorKind::ExpectCloseTag,
                                pos,
                            });
                        }
                        self.skip_ws();
                        if self.chars.next_if(|(_, c)| *c == '>').is_some() {
                            break;
                        } else {
                            return Err(self.emit_error(SyntaxErrorKind::ExpectCloseTag));
                        }
                    } else {
                        children.push(self.parse_node()?);
                    }
                }
                Some(..) => children.push(self.parse_node()?),
                None => return Err(self.emit_error(SyntaxErrorKind::ExpectCloseTag)),
            }
        }

        Ok(Element {
            tag_name,
            attrs,
            children,
        })
    }

    fn parse_node(&mut self) -> PResult<Node<'s>> {
        match self.chars.peek() {
            Some((_, '<')) => {
                let mut chars = self.chars.clone();
                chars.next();
                match chars.next() {
                    Some((_, c)) if is_tag_name_char(c) => self.parse_element().map(Node::Element),
                    Some((_, '!')) => self
                        .try_parse(Parser::parse_comment)
                        .map(Node::Comment)
                        .or_else(|_| self.parse_directive().map(Node::Directive)),
                    Some((_, '?')) => self.parse_directive().map(Node::Directive),
                    Some((_, '/')) => Err(self.emit_error(SyntaxErrorKind::UnexpectedCloseTag)),
                    _ => self.parse_text_node().map(Node::Text),
                }
            }
            Some(..) => self.parse_text_node().map(Node::Text),
            None => Err(self.emit_error(SyntaxErrorKind::ExpectElement)),
        }
    }

    pub fn parse_root(&mut self) -> PResult<Root<'s>> {
        let mut children = vec![];
        while self.chars.peek().is_some() {
            children.push(self.parse_node()?);
        }

        Ok(Root { children })
    }

    fn parse_tag_name(&mut self) -> PResult<&'s str> {
        let Some((start, _)) = self.chars.next_if(|(_, c)| is_tag_name_char(*c)) else {
            return Err(self.emit_error(SyntaxErrorKind::ExpectTagName));
        };
        while self.chars.next_if(|(_, c)| is_tag_name_char(*c)).is_some() {}
        let end = self.current_pos();
        Ok(&self.source[start..end])
    }

    fn parse_text_node(&mut self) -> PResult<TextNode<'s>> {
        let Some((start, _)) = self.chars.peek().copied() else {
            return Err(self.emit_error(SyntaxErrorKind::ExpectTextNode));
        };

        let end;
        let mut is_first = true;
        loop {
            match self.chars.peek() {
                Some((i, '<')) if !is_first => {
                    let i = *i;
                    let mut chars = self.chars.clone();
                    chars.next();
                    match chars.next() {
                        Some((_, c)) if is_tag_name_char(c) || matches!(c, '/' | '!' | '?') => {
                            end = i;
                            break;
                        }
                        _ => {
                            self.chars.next();
                        }
                    }
                }
                Some((i, '{')) => {
                    let i = *i;
                    self.chars.next();
                    if self.chars.next_if(|(_, c)| *c == '{').is_some() {
                        // `<` inside interpolations isn't a tag
                        if let Some(close) = template::find_expression_end(self.source, i + 2) {
                            while self.chars.next_if(|(j, _)| *j < close + 2).is_some() {}
                        }
                    }
                }
                Some(..) => {
                    self.chars.next();
                }
                None => {
                    end = self.source.len();
                    break;
                }
            }
            is_first = false;
        }

        let raw = &self.source[start..end];
        Ok(TextNode {
            raw,
            start,
            line_breaks: raw.bytes().filter(|byte| *byte == b'\n').count(),
        })
    }
}

fn is_tag_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' || c == ':' || !c.is_ascii()
}

fn is_attr_name_char(c: char) -> bool {
    !matches!(c, '"' | '\'' | '>' | '/' | '=') && !c.is_ascii_whitespace()
}

pub type PResult<T> = Result<T, SyntaxError>;
