// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Thicket DOM: a minimal, `no_std` in-memory element tree.
//!
//! Thicket DOM is the document model the block framework in `thicket_blocks` is
//! tested and demonstrated against. It stores elements (tag + ordered attributes)
//! in a generational slot tree and answers the questions an event delegation
//! layer asks: who is my parent, does this node match a selector, does this
//! subtree contain that node, where is the element with this id.
//!
//! ## Not a browser
//!
//! There is no HTML parser, no layout, no styles and no event loop here.
//! Trees are built programmatically with [`Document::insert`] and [`Element`]
//! builders. Native events are modelled by the consumer, not by this crate.
//!
//! ## API overview
//!
//! - [`Document`]: the tree, rooted at an `<html>` element.
//! - [`Element`]: per-node payload (tag, attributes, class helpers).
//! - [`NodeId`]: generational handle of a node.
//! - [`Selector`]: a parsed selector list; see [`selector`] for the grammar.
//!
//! Key operations:
//! - [`Document::insert`] → [`NodeId`], [`Document::remove`], [`Document::reparent`]
//! - [`Document::attr`] / [`Document::set_attr`] and the class helpers
//! - [`Document::matches`], [`Document::query_all`], [`Document::contains`]
//!
//! ## Minimal usage
//!
//! ```
//! use thicket_dom::{Document, Element};
//!
//! let mut doc = Document::new();
//! let root = doc.root();
//! let popup = doc.insert(
//!     Some(root),
//!     Element::new("div").with_id("p1").with_attr("data-nb", "popup"),
//! );
//! let close = doc.insert(Some(popup), Element::new("span").with_class("close"));
//!
//! assert!(doc.matches(close, "[data-nb=popup] .close"));
//! assert!(doc.contains(popup, close));
//! assert_eq!(doc.element_by_id("p1"), Some(popup));
//! assert_eq!(doc.query_all(root, "[data-nb]"), vec![popup]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod selector;
mod tree;
mod types;

pub use selector::{Selector, SelectorError};
pub use tree::Document;
pub use types::{Element, NodeId};
