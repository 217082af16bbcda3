// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handlers and the arguments they receive.

use alloc::rc::Rc;
use core::any::Any;
use core::fmt;

use kurbo::Point;

use crate::block::Block;
use crate::dom::Dom;
use crate::types::{NativeEvent, Outcome};

/// What a handler is invoked with.
pub enum EventArgs<'a, N> {
    /// A native event, with the node the handler's selector matched (the block
    /// node for handlers without a selector).
    Native {
        /// The dispatched event.
        event: &'a NativeEvent<N>,
        /// The matched node.
        node: N,
    },
    /// A custom event raised with [`Block::trigger`].
    Custom {
        /// Event name.
        name: &'a str,
        /// Optional payload.
        params: Option<&'a dyn Any>,
    },
}

impl<'a, N: Copy> EventArgs<'a, N> {
    /// The native event, if this is one.
    pub fn native(&self) -> Option<&'a NativeEvent<N>> {
        match self {
            Self::Native { event, .. } => Some(*event),
            Self::Custom { .. } => None,
        }
    }

    /// The matched node of a native event.
    pub fn node(&self) -> Option<N> {
        match self {
            Self::Native { node, .. } => Some(*node),
            Self::Custom { .. } => None,
        }
    }

    /// Pointer position of a native event, when the host supplied one.
    pub fn point(&self) -> Option<Point> {
        self.native().and_then(|event| event.point)
    }

    /// Event name: the kind name for native events.
    pub fn name(&self) -> &'a str {
        match self {
            Self::Native { event, .. } => event.kind.name(),
            Self::Custom { name, .. } => *name,
        }
    }

    /// Downcast the custom payload.
    pub fn params<T: 'static>(&self) -> Option<&'a T> {
        match self {
            Self::Custom { params, .. } => (*params).and_then(|p| p.downcast_ref::<T>()),
            Self::Native { .. } => None,
        }
    }
}

impl<N: fmt::Debug> fmt::Debug for EventArgs<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native { event, node } => f
                .debug_struct("Native")
                .field("event", event)
                .field("node", node)
                .finish(),
            Self::Custom { name, params } => f
                .debug_struct("Custom")
                .field("name", name)
                .field("params", &params.is_some())
                .finish(),
        }
    }
}

type HandlerFn<D> = dyn Fn(&Block<D>, &EventArgs<'_, <D as Dom>::Node>) -> Outcome;

/// A shareable event handler.
///
/// Identity is pointer identity: clones compare equal under [`Handler::ptr_eq`],
/// two handlers built from identical closures do not. Unsubscribing with
/// [`Block::off`] relies on this.
pub struct Handler<D: Dom>(Rc<HandlerFn<D>>);

impl<D: Dom> Handler<D> {
    /// Wrap a closure returning `()`, `bool` or [`Outcome`].
    pub fn new<F, R>(f: F) -> Self
    where
        F: Fn(&Block<D>, &EventArgs<'_, D::Node>) -> R + 'static,
        R: Into<Outcome>,
    {
        let f: Rc<HandlerFn<D>> =
            Rc::new(move |block: &Block<D>, args: &EventArgs<'_, D::Node>| f(block, args).into());
        Self(f)
    }

    /// Invoke the handler.
    pub fn call(&self, block: &Block<D>, args: &EventArgs<'_, D::Node>) -> Outcome {
        (self.0)(block, args)
    }

    /// Returns true if both handles refer to the same handler.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<D: Dom> Clone for Handler<D> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<D: Dom> fmt::Debug for Handler<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handler")
            .field(&Rc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

/// Run a chain last-to-first, so handlers merged in after their base run first.
///
/// Stops at the first `halt_chain`. The returned outcome has `halt_chain` set
/// when the chain was cut short and `halt_bubble` set when any handler asked
/// for it.
pub(crate) fn run_chain<D: Dom>(
    handlers: &[Handler<D>],
    block: &Block<D>,
    args: &EventArgs<'_, D::Node>,
) -> Outcome {
    let mut out = Outcome::CONTINUE;
    for handler in handlers.iter().rev() {
        let step = handler.call(block, args);
        out.halt_bubble |= step.halt_bubble;
        if step.halt_chain {
            out.halt_chain = true;
            break;
        }
    }
    out
}

/// Fold a chain into a single handler that runs it with [`run_chain`].
pub(crate) fn chain<D: Dom>(handlers: &[Handler<D>]) -> Handler<D> {
    let handlers = handlers.to_vec();
    Handler::new(move |block: &Block<D>, args: &EventArgs<'_, D::Node>| {
        run_chain(&handlers, block, args)
    })
}
