// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`Dom`] for [`thicket_dom::Document`].
//!
//! ## Feature
//!
//! Enable with `document_adapter` (on by default).
//!
//! ## Notes
//!
//! Stale node ids behave like detached nodes: no parent, no attributes, and
//! writes are dropped.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use kurbo::Point;
use thicket_dom::{Document, NodeId};

use crate::dom::Dom;
use crate::types::{EventKind, NativeEvent};

impl Dom for Document {
    type Node = NodeId;

    fn root(&self) -> NodeId {
        Self::root(self)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.parent_of(node)
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.attr(node, name).map(ToString::to_string)
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        self.set_attr(node, name, value);
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) {
        self.remove_attr(node, name);
    }

    fn attributes(&self, node: NodeId) -> Vec<(String, String)> {
        self.element(node)
            .map(|el| el.attributes().to_vec())
            .unwrap_or_default()
    }

    fn matches(&self, node: NodeId, selector: &str) -> bool {
        Self::matches(self, node, selector)
    }

    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        Self::contains(self, ancestor, node)
    }

    fn query_all(&self, scope: NodeId, selector: &str) -> Vec<NodeId> {
        Self::query_all(self, scope, selector)
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        Self::element_by_id(self, id)
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        Self::has_class(self, node, class)
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        Self::add_class(self, node, class);
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        Self::remove_class(self, node, class);
    }
}

/// The `mouseout` / `mouseover` pair for a pointer moving from `from` to `to`,
/// stamped with the pointer position `at`.
///
/// Returns nothing when both are the same node; only `mouseover` when the
/// pointer enters the document.
pub fn pointer_transition(
    from: Option<NodeId>,
    to: NodeId,
    at: Point,
) -> Vec<NativeEvent<NodeId>> {
    let mut events = Vec::new();
    match from {
        Some(from) if from == to => {}
        Some(from) => {
            events.push(
                NativeEvent::new(EventKind::MouseOut, from)
                    .with_related(to)
                    .at(at),
            );
            events.push(
                NativeEvent::new(EventKind::MouseOver, to)
                    .with_related(from)
                    .at(at),
            );
        }
        None => events.push(NativeEvent::new(EventKind::MouseOver, to).at(at)),
    }
    events
}
