// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared fixtures for unit tests.

use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::RefCell;

use thicket_dom::{Document, Element, NodeId};

use crate::block::Block;
use crate::blocks::Blocks;
use crate::handler::EventArgs;
use crate::types::{EventKind, NativeEvent, Outcome, Propagation};

/// Ordered record of handler invocations.
#[derive(Clone, Default)]
pub(crate) struct Log(Rc<RefCell<Vec<String>>>);

impl Log {
    pub(crate) fn push(&self, entry: &str) {
        self.0.borrow_mut().push(entry.to_string());
    }

    pub(crate) fn take(&self) -> Vec<String> {
        core::mem::take(&mut *self.0.borrow_mut())
    }

    /// A handler that records `entry` and continues.
    pub(crate) fn note(
        &self,
        entry: &str,
    ) -> impl Fn(&Block<Document>, &EventArgs<'_, NodeId>) -> Outcome + 'static {
        self.note_then(entry, Outcome::CONTINUE)
    }

    /// A handler that records `entry` and returns `outcome`.
    pub(crate) fn note_then(
        &self,
        entry: &str,
        outcome: Outcome,
    ) -> impl Fn(&Block<Document>, &EventArgs<'_, NodeId>) -> Outcome + 'static {
        let log = self.clone();
        let entry = entry.to_string();
        move |_: &Block<Document>, _: &EventArgs<'_, NodeId>| {
            log.push(&entry);
            outcome
        }
    }
}

/// `root > outer > inner > button.btn > span.label`, with the given markers on
/// `outer` and `inner` (no marker when empty).
pub(crate) struct Nested {
    pub(crate) blocks: Blocks<Document>,
    pub(crate) outer: NodeId,
    pub(crate) inner: NodeId,
    pub(crate) btn: NodeId,
    pub(crate) label: NodeId,
}

impl Nested {
    pub(crate) fn new(outer_marker: &str, inner_marker: &str) -> Self {
        let mut doc = Document::new();
        let root = doc.root();
        let mut outer_el = Element::new("div").with_id("outer");
        if !outer_marker.is_empty() {
            outer_el = outer_el.with_attr("data-nb", outer_marker);
        }
        let mut inner_el = Element::new("div").with_id("inner");
        if !inner_marker.is_empty() {
            inner_el = inner_el.with_attr("data-nb", inner_marker);
        }
        let outer = doc.insert(Some(root), outer_el);
        let inner = doc.insert(Some(outer), inner_el);
        let btn = doc.insert(Some(inner), Element::new("button").with_class("btn"));
        let label = doc.insert(Some(btn), Element::new("span").with_class("label"));
        let blocks = Blocks::new(doc).unwrap();
        Self {
            blocks,
            outer,
            inner,
            btn,
            label,
        }
    }

    pub(crate) fn send(&self, event: NativeEvent<NodeId>) -> Propagation {
        self.blocks.dispatch(&event).unwrap()
    }

    pub(crate) fn click(&self, target: NodeId) -> Propagation {
        self.send(NativeEvent::new(EventKind::Click, target))
    }
}
