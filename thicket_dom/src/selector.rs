// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small CSS selector engine.
//!
//! ## Supported grammar
//!
//! - Selector lists separated by `,`.
//! - Descendant (whitespace) and child (`>`) combinators.
//! - Compounds built from `*` or a tag name, `#id`, `.class`, and attribute tests:
//!   `[attr]`, `[attr=v]`, `[attr~=v]`, `[attr^=v]`, `[attr$=v]`, `[attr*=v]`.
//!   Values may be bare identifiers or single/double quoted strings.
//!
//! Pseudo-classes, sibling combinators and namespaces are not supported and
//! produce a [`SelectorError`].
//!
//! Matching is right-to-left: the rightmost compound is tested against the node,
//! then combinators walk towards the root with backtracking for descendants.

use alloc::string::String;
use alloc::vec::Vec;

use thiserror::Error;

use crate::tree::Document;
use crate::types::{Element, NodeId};

/// Errors produced while parsing a selector.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SelectorError {
    /// The selector was empty or contained only whitespace.
    #[error("empty selector")]
    Empty,
    /// Input ended where a selector component was expected.
    #[error("selector ended unexpectedly")]
    UnexpectedEnd,
    /// A character that cannot start or continue the current component.
    #[error("unexpected `{found}` at offset {offset}")]
    Unexpected {
        /// The offending character.
        found: char,
        /// Character offset into the selector.
        offset: usize,
    },
    /// An attribute test was not closed with `]`.
    #[error("unterminated attribute selector")]
    UnterminatedAttribute,
    /// A quoted value was not closed.
    #[error("unterminated string")]
    UnterminatedString,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum AttrOp {
    Equals,
    Includes,
    Prefix,
    Suffix,
    Substring,
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct AttrTest {
    name: String,
    op: Option<(AttrOp, String)>,
}

impl AttrTest {
    fn matches(&self, el: &Element) -> bool {
        let Some(actual) = el.attr(&self.name) else {
            return false;
        };
        match &self.op {
            None => true,
            Some((AttrOp::Equals, v)) => actual == v.as_str(),
            Some((AttrOp::Includes, v)) => actual.split_ascii_whitespace().any(|t| t == v.as_str()),
            Some((AttrOp::Prefix, v)) => !v.is_empty() && actual.starts_with(v.as_str()),
            Some((AttrOp::Suffix, v)) => !v.is_empty() && actual.ends_with(v.as_str()),
            Some((AttrOp::Substring, v)) => !v.is_empty() && actual.contains(v.as_str()),
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct Compound {
    // None matches any tag.
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrTest>,
}

impl Compound {
    fn matches(&self, el: &Element) -> bool {
        if let Some(tag) = &self.tag
            && el.tag() != tag.as_str()
        {
            return false;
        }
        if let Some(id) = &self.id
            && el.attr("id") != Some(id.as_str())
        {
            return false;
        }
        self.classes.iter().all(|c| el.has_class(c)) && self.attrs.iter().all(|a| a.matches(el))
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct Complex {
    // Left to right; `combinators[i]` sits between `parts[i]` and `parts[i + 1]`.
    parts: Vec<Compound>,
    combinators: Vec<Combinator>,
}

impl Complex {
    fn matches_at(&self, doc: &Document, idx: usize, node: NodeId) -> bool {
        let Some(el) = doc.element(node) else {
            return false;
        };
        if !self.parts[idx].matches(el) {
            return false;
        }
        if idx == 0 {
            return true;
        }
        match self.combinators[idx - 1] {
            Combinator::Child => doc
                .parent_of(node)
                .is_some_and(|p| self.matches_at(doc, idx - 1, p)),
            Combinator::Descendant => {
                let mut cur = doc.parent_of(node);
                while let Some(p) = cur {
                    if self.matches_at(doc, idx - 1, p) {
                        return true;
                    }
                    cur = doc.parent_of(p);
                }
                false
            }
        }
    }
}

/// A parsed selector list.
///
/// ```
/// use thicket_dom::{Document, Element, Selector};
///
/// let mut doc = Document::new();
/// let root = doc.root();
/// let list = doc.insert(Some(root), Element::new("ul").with_class("menu"));
/// let item = doc.insert(Some(list), Element::new("li").with_attr("data-kind", "leaf"));
///
/// let sel = Selector::parse(".menu > li[data-kind=leaf]").unwrap();
/// assert!(sel.matches(&doc, item));
/// assert!(!sel.matches(&doc, list));
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Selector {
    alternatives: Vec<Complex>,
}

impl Selector {
    /// Parse a selector list.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        if input.trim().is_empty() {
            return Err(SelectorError::Empty);
        }
        let mut parser = Parser {
            chars: input.chars().collect(),
            pos: 0,
        };
        let alternatives = parser.list()?;
        Ok(Self { alternatives })
    }

    /// Returns true if `node` matches any alternative of this selector.
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        self.alternatives
            .iter()
            .any(|c| c.matches_at(doc, c.parts.len() - 1, node))
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.bump();
        }
        self.pos != start
    }

    fn unexpected(&self) -> SelectorError {
        match self.peek() {
            Some(found) => SelectorError::Unexpected {
                found,
                offset: self.pos,
            },
            None => SelectorError::UnexpectedEnd,
        }
    }

    fn ident(&mut self) -> Result<String, SelectorError> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.bump();
        }
        if start == self.pos {
            return Err(self.unexpected());
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn list(&mut self) -> Result<Vec<Complex>, SelectorError> {
        let mut out = Vec::new();
        loop {
            self.skip_ws();
            out.push(self.complex()?);
            self.skip_ws();
            match self.peek() {
                None => return Ok(out),
                Some(',') => self.bump(),
                Some(_) => return Err(self.unexpected()),
            }
        }
    }

    fn complex(&mut self) -> Result<Complex, SelectorError> {
        let mut parts = Vec::new();
        let mut combinators = Vec::new();
        parts.push(self.compound()?);
        loop {
            let had_ws = self.skip_ws();
            let combinator = match self.peek() {
                None | Some(',') => break,
                Some('>') => {
                    self.bump();
                    self.skip_ws();
                    Combinator::Child
                }
                Some(_) if had_ws => Combinator::Descendant,
                Some(_) => return Err(self.unexpected()),
            };
            combinators.push(combinator);
            parts.push(self.compound()?);
        }
        Ok(Complex { parts, combinators })
    }

    fn compound(&mut self) -> Result<Compound, SelectorError> {
        let start = self.pos;
        let mut c = Compound::default();
        match self.peek() {
            Some('*') => self.bump(),
            Some(ch) if is_ident_char(ch) => c.tag = Some(self.ident()?.to_ascii_lowercase()),
            _ => {}
        }
        loop {
            match self.peek() {
                Some('#') => {
                    self.bump();
                    c.id = Some(self.ident()?);
                }
                Some('.') => {
                    self.bump();
                    c.classes.push(self.ident()?);
                }
                Some('[') => {
                    self.bump();
                    c.attrs.push(self.attribute()?);
                }
                _ => break,
            }
        }
        if self.pos == start {
            return Err(self.unexpected());
        }
        Ok(c)
    }

    fn attribute(&mut self) -> Result<AttrTest, SelectorError> {
        self.skip_ws();
        let name = self.ident()?;
        self.skip_ws();
        let op = match self.peek() {
            Some(']') => None,
            Some('=') => Some(AttrOp::Equals),
            Some('~') => Some(AttrOp::Includes),
            Some('^') => Some(AttrOp::Prefix),
            Some('$') => Some(AttrOp::Suffix),
            Some('*') => Some(AttrOp::Substring),
            Some(_) => return Err(self.unexpected()),
            None => return Err(SelectorError::UnterminatedAttribute),
        };
        let Some(op) = op else {
            self.bump();
            return Ok(AttrTest { name, op: None });
        };
        if op != AttrOp::Equals {
            self.bump();
            if self.peek() != Some('=') {
                return Err(self.unexpected());
            }
        }
        self.bump();
        self.skip_ws();
        let value = match self.peek() {
            Some(q @ ('"' | '\'')) => self.quoted(q)?,
            Some(_) => self.ident()?,
            None => return Err(SelectorError::UnterminatedAttribute),
        };
        self.skip_ws();
        match self.peek() {
            Some(']') => {
                self.bump();
                Ok(AttrTest {
                    name,
                    op: Some((op, value)),
                })
            }
            Some(_) => Err(self.unexpected()),
            None => Err(SelectorError::UnterminatedAttribute),
        }
    }

    fn quoted(&mut self, quote: char) -> Result<String, SelectorError> {
        self.bump();
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == quote {
                let value = self.chars[start..self.pos].iter().collect();
                self.bump();
                return Ok(value);
            }
            self.bump();
        }
        Err(SelectorError::UnterminatedString)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, NodeId, NodeId, NodeId) {
        // <html><div id="p1" data-nb="popup" class="box"><p><span class="close x"></span></p></div></html>
        let mut doc = Document::new();
        let root = doc.root();
        let div = doc.insert(
            Some(root),
            Element::new("div")
                .with_id("p1")
                .with_attr("data-nb", "popup")
                .with_class("box"),
        );
        let p = doc.insert(Some(div), Element::new("p"));
        let span = doc.insert(
            Some(p),
            Element::new("span").with_class("close").with_class("x"),
        );
        (doc, div, p, span)
    }

    #[test]
    fn compound_parts_must_all_match() {
        let (doc, div, _, span) = sample();
        let sel = Selector::parse("span.close.x").unwrap();
        assert!(sel.matches(&doc, span));
        assert!(!Selector::parse("span.close.y").unwrap().matches(&doc, span));
        assert!(Selector::parse("div#p1.box").unwrap().matches(&doc, div));
        assert!(Selector::parse("*").unwrap().matches(&doc, div));
        assert!(Selector::parse("DIV").unwrap().matches(&doc, div), "tags are case-insensitive");
    }

    #[test]
    fn attribute_operators() {
        let (doc, div, _, span) = sample();
        assert!(Selector::parse("[data-nb]").unwrap().matches(&doc, div));
        assert!(!Selector::parse("[data-nb]").unwrap().matches(&doc, span));
        assert!(Selector::parse("[data-nb=popup]").unwrap().matches(&doc, div));
        assert!(Selector::parse("[data-nb='popup']").unwrap().matches(&doc, div));
        assert!(Selector::parse("[class~=x]").unwrap().matches(&doc, span));
        assert!(Selector::parse("[class^=clo]").unwrap().matches(&doc, span));
        assert!(Selector::parse("[class$=\" x\"]").unwrap().matches(&doc, span));
        assert!(Selector::parse("[id*=1]").unwrap().matches(&doc, div));
        assert!(!Selector::parse("[id^='']").unwrap().matches(&doc, div));
    }

    #[test]
    fn combinators_walk_towards_the_root() {
        let (doc, div, p, span) = sample();
        assert!(Selector::parse("div span").unwrap().matches(&doc, span));
        assert!(Selector::parse("html div > p > .close").unwrap().matches(&doc, span));
        assert!(!Selector::parse("div > span").unwrap().matches(&doc, span));
        assert!(Selector::parse("div>p").unwrap().matches(&doc, p));
        assert!(!Selector::parse("p div").unwrap().matches(&doc, div));
    }

    #[test]
    fn lists_match_any_alternative() {
        let (doc, div, p, span) = sample();
        let sel = Selector::parse(".close, p").unwrap();
        assert!(sel.matches(&doc, span));
        assert!(sel.matches(&doc, p));
        assert!(!sel.matches(&doc, div));
    }

    #[test]
    fn malformed_selectors_are_rejected() {
        assert_eq!(Selector::parse("  "), Err(SelectorError::Empty));
        assert_eq!(Selector::parse("div >"), Err(SelectorError::UnexpectedEnd));
        assert_eq!(Selector::parse("a,"), Err(SelectorError::UnexpectedEnd));
        assert_eq!(
            Selector::parse("[data-nb"),
            Err(SelectorError::UnterminatedAttribute)
        );
        assert_eq!(
            Selector::parse("[a='x]"),
            Err(SelectorError::UnterminatedString)
        );
        assert_eq!(
            Selector::parse("a:hover"),
            Err(SelectorError::Unexpected {
                found: ':',
                offset: 1
            })
        );
    }
}
