// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Enter/leave emulation on top of `mouseover` / `mouseout`.
//!
//! Native hover events fire every time the pointer crosses any node boundary,
//! including moves between a block and its own descendants. Handlers declared
//! for hover kinds should instead behave like enter/leave: fire when the pointer
//! crosses into or out of the matched node as a whole.
//!
//! When an event carries a related node (the node the pointer came from for
//! `mouseover`, or went to for `mouseout`), the delegated walk narrows as
//! follows:
//!
//! - the only interior candidate is the event target (nothing when the target
//!   is the block node itself);
//! - a candidate is skipped when it strictly contains the related node, since
//!   the pointer never left it;
//! - the walk stops after the innermost block.
//!
//! Without a related node, hover kinds are treated like any bubbling event.
//!
//! ## Minimal example
//!
//! ```
//! use thicket_blocks::hover::HoverScope;
//! use thicket_blocks::types::{EventKind, NativeEvent};
//!
//! let path = [3_u32, 2, 1];
//! let plain = HoverScope::new(&NativeEvent::new(EventKind::MouseOver, 3_u32));
//! assert_eq!(plain.interior(&path, 2), &[3, 2]);
//!
//! let scoped = HoverScope::new(&NativeEvent::new(EventKind::MouseOver, 3_u32).with_related(9));
//! assert_eq!(scoped.interior(&path, 2), &[3]);
//! assert_eq!(scoped.interior(&path, 0), &[] as &[u32]);
//! assert!(scoped.truncates());
//! ```

use crate::dom::Dom;
use crate::types::NativeEvent;

/// Hover narrowing for one dispatch.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct HoverScope<N> {
    related: Option<N>,
    hover: bool,
}

impl<N: Copy> HoverScope<N> {
    /// Derive the scope of `event`.
    pub fn new(event: &NativeEvent<N>) -> Self {
        Self {
            related: event.related,
            hover: event.kind.is_hover(),
        }
    }

    /// Returns true if enter/leave narrowing applies.
    pub fn is_scoped(&self) -> bool {
        self.hover && self.related.is_some()
    }

    /// Interior candidates for the block at `path[boundary]`, innermost first.
    ///
    /// `path` runs from the event target to the root.
    pub fn interior<'p>(&self, path: &'p [N], boundary: usize) -> &'p [N] {
        let end = boundary.min(path.len());
        if self.is_scoped() {
            &path[..end.min(1)]
        } else {
            &path[..end]
        }
    }

    /// Returns true if `node` must be skipped because it contains the related node.
    pub fn excludes<D: Dom<Node = N>>(&self, dom: &D, node: N) -> bool {
        match self.related {
            Some(related) if self.hover => dom.contains(node, related),
            _ => false,
        }
    }

    /// Returns true if the walk ends after the first block.
    ///
    /// Any event with a related node truncates, hover kind or not.
    pub fn truncates(&self) -> bool {
        self.related.is_some()
    }
}
