// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Listeners bound to concrete nodes.
//!
//! These back [`Block::on`](crate::block::Block::on) for native specs and the
//! `local` tables of classes. Unlike delegated class handlers they are tied to
//! one node and one block instance, and they run before the delegated walk.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::block::Block;
use crate::dom::Dom;
use crate::handler::Handler;
use crate::types::EventKind;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub(crate) struct BindingId(u64);

struct Binding<D: Dom> {
    id: BindingId,
    node: D::Node,
    kind: EventKind,
    selector: String,
    handler: Handler<D>,
    block: Block<D>,
}

/// A binding snapshot taken for one dispatch step.
pub(crate) struct Bound<D: Dom> {
    pub(crate) block: Block<D>,
    pub(crate) selector: String,
    pub(crate) handler: Handler<D>,
}

pub(crate) struct Bindings<D: Dom> {
    next: u64,
    list: Vec<Binding<D>>,
}

impl<D: Dom> Bindings<D> {
    pub(crate) fn new() -> Self {
        Self {
            next: 0,
            list: Vec::new(),
        }
    }

    pub(crate) fn bind(
        &mut self,
        block: Block<D>,
        node: D::Node,
        kind: EventKind,
        selector: &str,
        handler: Handler<D>,
    ) -> BindingId {
        let id = BindingId(self.next);
        self.next += 1;
        self.list.push(Binding {
            id,
            node,
            kind,
            selector: selector.to_string(),
            handler,
            block,
        });
        id
    }

    /// Remove bindings on `node` for `kind`.
    ///
    /// An empty selector without a handler removes every binding of the kind;
    /// otherwise only bindings with this exact selector are considered, further
    /// narrowed to `handler` when given. Returns how many were removed.
    pub(crate) fn unbind(
        &mut self,
        node: D::Node,
        kind: EventKind,
        selector: &str,
        handler: Option<&Handler<D>>,
    ) -> usize {
        let before = self.list.len();
        self.list.retain(|b| {
            let hit = b.node == node
                && b.kind == kind
                && ((handler.is_none() && selector.is_empty()) || b.selector == selector)
                && handler.is_none_or(|h| h.ptr_eq(&b.handler));
            !hit
        });
        before - self.list.len()
    }

    pub(crate) fn unbind_ids(&mut self, ids: &[BindingId]) {
        self.list.retain(|b| !ids.contains(&b.id));
    }

    pub(crate) fn on_node(&self, node: D::Node, kind: EventKind) -> Vec<Bound<D>> {
        self.list
            .iter()
            .filter(|b| b.node == node && b.kind == kind)
            .map(|b| Bound {
                block: b.block.clone(),
                selector: b.selector.clone(),
                handler: b.handler.clone(),
            })
            .collect()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}
