// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Native event dispatch.
//!
//! A dispatch has two passes over the path from the target to the root:
//!
//! 1. **Node-bound listeners** registered with [`Block::on`] (and class `local`
//!    tables) run first, node by node.
//! 2. **Delegated class handlers** run for kinds some class declared. Walking
//!    up, every node carrying the marker attribute is a block boundary. For each
//!    class named on it, and each event layer of that class, selector chains are
//!    tried against the nodes between the target and the boundary (innermost
//!    first), then the block's own chain runs on the block node.
//!
//! Either pass stops at the first boundary (or node) where a handler asked to
//! halt bubbling. See [`hover`](crate::hover) for how `mouseover` / `mouseout`
//! narrow the walk.

use alloc::rc::Rc;
use alloc::vec::Vec;

use crate::block::Block;
use crate::blocks::Context;
use crate::class::{BlockClass, Selectors, SlotTable};
use crate::dom::{Dom, Settings};
use crate::error::Error;
use crate::handler::{EventArgs, Handler, run_chain};
use crate::hover::HoverScope;
use crate::types::{EventKind, NativeEvent, Propagation};

pub(crate) struct Dispatcher<'a, D: Dom> {
    ctx: &'a Rc<Context<D>>,
    event: &'a NativeEvent<D::Node>,
    path: Vec<D::Node>,
    hover: HoverScope<D::Node>,
}

impl<'a, D: Dom> Dispatcher<'a, D> {
    pub(crate) fn new(ctx: &'a Rc<Context<D>>, event: &'a NativeEvent<D::Node>) -> Self {
        let path = {
            let dom = ctx.dom.borrow();
            let mut path = Vec::new();
            let mut cur = Some(event.target);
            while let Some(node) = cur {
                path.push(node);
                cur = dom.parent(node);
            }
            path
        };
        Self {
            ctx,
            event,
            path,
            hover: HoverScope::new(event),
        }
    }

    pub(crate) fn run(&self) -> Result<Propagation, Error> {
        let kind = self.event.kind;
        tracing::trace!(event = kind.name(), depth = self.path.len(), "dispatch");
        if self.run_bindings() {
            return Ok(Propagation::Stopped);
        }
        if !self.ctx.registry.borrow().is_wired(kind) {
            return Ok(Propagation::Completed);
        }
        if kind == EventKind::Click && self.event.button != 0 {
            tracing::trace!(button = self.event.button, "ignoring non-primary click");
            return Ok(Propagation::Ignored);
        }
        self.delegate()
    }

    /// Node-bound pass. Returns true if a handler halted bubbling.
    fn run_bindings(&self) -> bool {
        if self.ctx.bindings.borrow().is_empty() {
            return false;
        }
        let kind = self.event.kind;
        for (depth, &node) in self.path.iter().enumerate() {
            let bound = self.ctx.bindings.borrow().on_node(node, kind);
            let mut halted = false;
            for b in bound {
                if b.selector.is_empty() {
                    if kind.bubbles() || depth == 0 {
                        halted |= self.fire(&b.handler, &b.block, node);
                    }
                    continue;
                }
                let candidates = if kind.bubbles() {
                    &self.path[..depth]
                } else {
                    &self.path[..depth.min(1)]
                };
                for &candidate in candidates {
                    if self.ctx.matches(candidate, &b.selector) {
                        halted |= self.fire(&b.handler, &b.block, candidate);
                    }
                }
            }
            if halted {
                return true;
            }
        }
        false
    }

    fn fire(&self, handler: &Handler<D>, block: &Block<D>, node: D::Node) -> bool {
        let args = EventArgs::Native {
            event: self.event,
            node,
        };
        handler.call(block, &args).halt_bubble
    }

    /// Delegated pass over block boundaries.
    fn delegate(&self) -> Result<Propagation, Error> {
        let marker = &self.ctx.settings.marker_attribute;
        for (depth, &block_node) in self.path.iter().enumerate() {
            let Some(names) = Settings::class_names(self.ctx.attribute(block_node, marker)) else {
                continue;
            };
            let interior = self.hover.interior(&self.path, depth);
            let mut halted = false;
            for name in &names {
                let class = self.ctx.class(name)?;
                for layer in class.layers() {
                    if let Some(selectors) = layer.dom(self.event.kind) {
                        halted |= self.check(&class, block_node, interior, selectors);
                    }
                }
            }
            if halted {
                tracing::trace!(node = ?block_node, "bubbling halted");
                return Ok(Propagation::Stopped);
            }
            if self.hover.truncates() {
                return Ok(Propagation::Truncated);
            }
        }
        Ok(Propagation::Completed)
    }

    /// Run one layer's chains for the block at `block_node`. Returns true if a
    /// chain halted bubbling.
    fn check(
        &self,
        class: &Rc<BlockClass<D>>,
        block_node: D::Node,
        interior: &[D::Node],
        selectors: &Selectors<D>,
    ) -> bool {
        for &node in interior {
            let mut halted = false;
            for (selector, slot) in selectors.iter() {
                if selector.is_empty() || slot.handlers().is_empty() {
                    continue;
                }
                if self.ctx.matches(node, selector) && !self.excluded(node) {
                    halted |= self.run_slot(class, block_node, node, slot.handlers());
                }
            }
            if halted {
                return true;
            }
        }
        let own = selectors.handlers("");
        if own.is_empty() || self.excluded(block_node) {
            return false;
        }
        self.run_slot(class, block_node, block_node, own)
    }

    fn excluded(&self, node: D::Node) -> bool {
        self.hover.excludes(&*self.ctx.dom.borrow(), node)
    }

    fn run_slot(
        &self,
        class: &Rc<BlockClass<D>>,
        block_node: D::Node,
        node: D::Node,
        handlers: &[Handler<D>],
    ) -> bool {
        let block = class.create(self.ctx, block_node, &[]);
        let args = EventArgs::Native {
            event: self.event,
            node,
        };
        run_chain(handlers, &block, &args).halt_bubble
    }
}
