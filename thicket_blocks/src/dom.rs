// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The document collaborator and framework settings.
//!
//! Blocks never own the document. They read and write it through the [`Dom`]
//! trait, which a host implements over its own tree. An implementation for
//! [`thicket_dom::Document`] lives in [`adapters`](crate::adapters) behind the
//! `document_adapter` feature.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt::Debug;

/// Tree queries and attribute access the framework needs from a document.
///
/// Node handles are small copyable values. Implementations decide what a stale
/// handle means; the framework only ever passes back handles it received from
/// the same document.
pub trait Dom: 'static {
    /// Node handle.
    type Node: Copy + Eq + Debug + 'static;

    /// The document element.
    fn root(&self) -> Self::Node;

    /// Parent of `node`, or `None` at the root.
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// Attribute value of `node`.
    fn attribute(&self, node: Self::Node, name: &str) -> Option<String>;

    /// Set an attribute on `node`.
    fn set_attribute(&mut self, node: Self::Node, name: &str, value: &str);

    /// Remove an attribute from `node`.
    fn remove_attribute(&mut self, node: Self::Node, name: &str);

    /// All attributes of `node` in document order.
    fn attributes(&self, node: Self::Node) -> Vec<(String, String)>;

    /// Returns true if `node` matches `selector`. Invalid selectors match nothing.
    fn matches(&self, node: Self::Node, selector: &str) -> bool;

    /// Returns true if `node` is a strict descendant of `ancestor`.
    fn contains(&self, ancestor: Self::Node, node: Self::Node) -> bool;

    /// Descendants of `scope` (excluding `scope`) matching `selector`, in document order.
    fn query_all(&self, scope: Self::Node, selector: &str) -> Vec<Self::Node>;

    /// The node whose `id` attribute equals `id`.
    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// Class tokens of `node`.
    fn classes(&self, node: Self::Node) -> Vec<String> {
        self.attribute(node, "class")
            .unwrap_or_default()
            .split_ascii_whitespace()
            .map(ToString::to_string)
            .collect()
    }

    /// Returns true if `node` carries the class token `class`.
    fn has_class(&self, node: Self::Node, class: &str) -> bool {
        self.classes(node).iter().any(|c| c == class)
    }

    /// Add a class token to `node` unless already present.
    fn add_class(&mut self, node: Self::Node, class: &str) {
        let mut classes = self.classes(node);
        if class.is_empty() || classes.iter().any(|c| c == class) {
            return;
        }
        classes.push(class.to_string());
        self.set_attribute(node, "class", &classes.join(" "));
    }

    /// Remove a class token from `node`.
    fn remove_class(&mut self, node: Self::Node, class: &str) {
        let classes = self.classes(node);
        if !classes.iter().any(|c| c == class) {
            return;
        }
        let kept: Vec<&str> = classes
            .iter()
            .map(String::as_str)
            .filter(|c| *c != class)
            .collect();
        self.set_attribute(node, "class", &kept.join(" "));
    }
}

/// Attribute and class names the framework reads and writes.
///
/// ```
/// use thicket_blocks::dom::Settings;
///
/// let s = Settings::default().with_marker_attribute("data-block");
/// assert_eq!(s.marker_attribute, "data-block");
/// assert_eq!(s.data_prefix, "data-block-");
/// assert_eq!(s.hidden_class, "_hidden");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Attribute holding the space-separated class names of a block node.
    pub marker_attribute: String,
    /// Prefix of block data attributes.
    pub data_prefix: String,
    /// Class toggled by [`Block::show`](crate::block::Block::show) and
    /// [`Block::hide`](crate::block::Block::hide).
    pub hidden_class: String,
    /// Class marking nodes that [`Blocks::init`](crate::blocks::Blocks::init) instantiates.
    pub auto_init_class: String,
    /// Prefix for generated node ids and anonymous class names.
    pub id_prefix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            marker_attribute: "data-nb".into(),
            data_prefix: "data-nb-".into(),
            hidden_class: "_hidden".into(),
            auto_init_class: "_init".into(),
            id_prefix: "nb-".into(),
        }
    }
}

impl Settings {
    /// Set the marker attribute; the data prefix follows it as `<marker>-`.
    #[must_use]
    pub fn with_marker_attribute(mut self, name: &str) -> Self {
        self.marker_attribute = name.to_string();
        self.data_prefix = alloc::format!("{name}-");
        self
    }

    /// Set the hidden class.
    #[must_use]
    pub fn with_hidden_class(mut self, class: &str) -> Self {
        self.hidden_class = class.to_string();
        self
    }

    /// Set the auto-init class.
    #[must_use]
    pub fn with_auto_init_class(mut self, class: &str) -> Self {
        self.auto_init_class = class.to_string();
        self
    }

    /// Set the prefix of generated ids and anonymous class names.
    #[must_use]
    pub fn with_id_prefix(mut self, prefix: &str) -> Self {
        self.id_prefix = prefix.to_string();
        self
    }

    /// Split a marker attribute value into class names. `None` when it names none.
    pub(crate) fn class_names(value: Option<String>) -> Option<Vec<String>> {
        let names: Vec<String> = value?
            .split_ascii_whitespace()
            .map(ToString::to_string)
            .collect();
        (!names.is_empty()).then_some(names)
    }
}
