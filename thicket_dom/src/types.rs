// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the document: node identifiers and element payloads.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

/// Identifier for a node in the document.
///
/// This is a small, copyable handle that stays stable across updates but becomes
/// invalid when the underlying slot is reused.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `NodeId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `NodeId`.
///
/// ### Liveness
///
/// Use [`Document::is_alive`](crate::Document::is_alive) to check whether a `NodeId` still refers to a live node.
/// Stale `NodeId`s never alias a different live node because the generation must match.
///
/// ### Ordering
///
/// The derived `Ord` compares slot index first and generation second. It is only
/// meant for use as a map key and says nothing about document order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    /// Returns the generation of this identifier.
    pub const fn generation(self) -> u32 {
        self.1
    }
}

/// An element payload: a tag name and an ordered attribute list.
///
/// Tag names are stored lowercase. Attribute names are case-sensitive and keep
/// insertion order; setting an existing attribute replaces its value in place.
///
/// ```
/// use thicket_dom::Element;
///
/// let el = Element::new("DIV").with_id("p1").with_class("popup").with_class("_init");
/// assert_eq!(el.tag(), "div");
/// assert_eq!(el.attr("class"), Some("popup _init"));
/// assert!(el.has_class("_init"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
}

impl Element {
    /// Create an element with the given tag and no attributes.
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: Vec::new(),
        }
    }

    /// Builder: set an attribute.
    #[must_use]
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder: set the `id` attribute.
    #[must_use]
    pub fn with_id(self, id: &str) -> Self {
        self.with_attr("id", id)
    }

    /// Builder: append a class token.
    #[must_use]
    pub fn with_class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    /// The lowercase tag name.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Look up an attribute value.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// All attributes in insertion order.
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Iterate the whitespace-separated tokens of the `class` attribute.
    pub fn classes(&self) -> impl Iterator<Item = &str> + '_ {
        self.attr("class").unwrap_or("").split_ascii_whitespace()
    }

    /// Returns true if the `class` attribute contains `class` as a token.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    pub(crate) fn set_attr(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => {
                v.clear();
                v.push_str(value);
            }
            None => self.attributes.push((name.to_string(), value.to_string())),
        }
    }

    pub(crate) fn remove_attr(&mut self, name: &str) -> Option<String> {
        let pos = self.attributes.iter().position(|(n, _)| n == name)?;
        Some(self.attributes.remove(pos).1)
    }

    pub(crate) fn add_class(&mut self, class: &str) -> bool {
        if class.is_empty() || self.has_class(class) {
            return false;
        }
        let mut value = String::from(self.attr("class").unwrap_or("").trim());
        if !value.is_empty() {
            value.push(' ');
        }
        value.push_str(class);
        self.set_attr("class", &value);
        true
    }

    pub(crate) fn remove_class(&mut self, class: &str) -> bool {
        if !self.has_class(class) {
            return false;
        }
        let kept: Vec<&str> = self.classes().filter(|c| *c != class).collect();
        let value = kept.join(" ");
        self.set_attr("class", &value);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_keep_insertion_order_and_replace_in_place() {
        let mut el = Element::new("span")
            .with_attr("a", "1")
            .with_attr("b", "2");
        el.set_attr("a", "3");
        let names: Vec<&str> = el.attributes().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(el.attr("a"), Some("3"));
        assert_eq!(el.remove_attr("a").as_deref(), Some("3"));
        assert_eq!(el.attr("a"), None);
    }

    #[test]
    fn class_tokens_are_deduplicated_and_removed_cleanly() {
        let mut el = Element::new("div").with_class("a").with_class("b");
        assert!(!el.add_class("a"), "duplicate token must not be added");
        assert!(el.remove_class("a"));
        assert_eq!(el.attr("class"), Some("b"));
        assert!(!el.remove_class("zzz"));
        assert!(!el.add_class(""), "empty token is ignored");
    }
}
