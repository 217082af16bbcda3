// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Block instances: the per-node component with its own custom event bus.
//!
//! A [`Block`] is a cheap handle; clones refer to the same instance. Instances
//! are created by the context (lazily during dispatch, or through
//! [`Blocks::block`](crate::blocks::Blocks::block) and friends) and cached per
//! (node id, class name) until destroyed.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::format;
use alloc::rc::{Rc, Weak};
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::any::Any;
use core::cell::{Cell, RefCell};
use core::fmt;

use crate::bindings::BindingId;
use crate::blocks::{Blocks, Context};
use crate::class::BlockClass;
use crate::dom::{Dom, Settings};
use crate::error::Error;
use crate::handler::{EventArgs, Handler};
use crate::types::{EventSpec, Outcome};

/// Lifecycle of a block. Transitions only move forward.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Lifecycle {
    /// Allocated; `init` handlers are running.
    Uninitialized,
    /// Initialized and cached.
    Active,
    /// Destroyed; custom triggers are ignored.
    Destroyed,
}

struct Declared<D: Dom> {
    custom: Vec<(String, Handler<D>)>,
    bindings: Vec<BindingId>,
}

struct Inner<D: Dom> {
    id: String,
    node: D::Node,
    class: Rc<BlockClass<D>>,
    ctx: Weak<Context<D>>,
    handlers: RefCell<BTreeMap<String, Vec<Handler<D>>>>,
    lifecycle: Cell<Lifecycle>,
    declared: RefCell<Declared<D>>,
    state: RefCell<Option<Box<dyn Any>>>,
}

/// A component instance bound to a node.
pub struct Block<D: Dom> {
    inner: Rc<Inner<D>>,
}

impl<D: Dom> Clone for Block<D> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<D: Dom> fmt::Debug for Block<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block")
            .field("id", &self.inner.id)
            .field("class", &self.inner.class.name())
            .field("node", &self.inner.node)
            .field("lifecycle", &self.inner.lifecycle.get())
            .finish_non_exhaustive()
    }
}

impl<D: Dom> Block<D> {
    pub(crate) fn new(
        class: Rc<BlockClass<D>>,
        ctx: &Rc<Context<D>>,
        id: String,
        node: D::Node,
        state: Option<Box<dyn Any>>,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                id,
                node,
                class,
                ctx: Rc::downgrade(ctx),
                handlers: RefCell::new(BTreeMap::new()),
                lifecycle: Cell::new(Lifecycle::Uninitialized),
                declared: RefCell::new(Declared {
                    custom: Vec::new(),
                    bindings: Vec::new(),
                }),
                state: RefCell::new(state),
            }),
        }
    }

    pub(crate) fn subscribe(&self, name: &str, handler: Handler<D>) {
        self.inner
            .handlers
            .borrow_mut()
            .entry(name.to_string())
            .or_default()
            .push(handler);
    }

    pub(crate) fn record_declared(&self, custom: Vec<(String, Handler<D>)>, bindings: Vec<BindingId>) {
        *self.inner.declared.borrow_mut() = Declared { custom, bindings };
    }

    /// Run the `init` handlers, announce the block on the space and apply the
    /// caller's extra handlers.
    pub(crate) fn init(&self, extra: &[(&str, Handler<D>)]) {
        self.trigger("init", None);
        if let Some(space) = self.ctx().and_then(|ctx| ctx.space()) {
            let name = format!("inited:{}", self.id());
            space.trigger(&name, Some(self as &dyn Any));
        }
        for (spec, handler) in extra {
            self.on(spec, handler.clone());
        }
        if self.inner.lifecycle.get() == Lifecycle::Uninitialized {
            self.inner.lifecycle.set(Lifecycle::Active);
        }
    }

    fn ctx(&self) -> Option<Rc<Context<D>>> {
        self.inner.ctx.upgrade()
    }

    /// The node's `id` attribute.
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// The class name.
    pub fn name(&self) -> &str {
        self.inner.class.name()
    }

    /// The block's class.
    pub fn class(&self) -> &Rc<BlockClass<D>> {
        &self.inner.class
    }

    /// The node this block is bound to.
    pub fn node(&self) -> D::Node {
        self.inner.node
    }

    /// Current lifecycle state.
    pub fn lifecycle(&self) -> Lifecycle {
        self.inner.lifecycle.get()
    }

    /// The owning context, while it is alive.
    pub fn context(&self) -> Option<Blocks<D>> {
        self.ctx().map(Blocks::from_context)
    }

    /// Returns true if both handles refer to the same instance.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Subscribe `handler` to `spec` and return it for a later [`off`](Self::off).
    ///
    /// Native specs (`"click"`, `"click .item"`) bind a listener on the block
    /// node; anything else joins the block's custom event list.
    pub fn on(&self, spec: &str, handler: Handler<D>) -> Handler<D> {
        match EventSpec::parse(spec) {
            EventSpec::Native { kind, selector } => {
                if let Some(ctx) = self.ctx() {
                    ctx.bindings.borrow_mut().bind(
                        self.clone(),
                        self.node(),
                        kind,
                        &selector,
                        handler.clone(),
                    );
                }
            }
            EventSpec::Custom(name) => self.subscribe(&name, handler.clone()),
        }
        handler
    }

    /// Unsubscribe from `spec`.
    ///
    /// For custom events, removes the first subscription of `handler`, or every
    /// subscription when `handler` is `None`.
    pub fn off(&self, spec: &str, handler: Option<&Handler<D>>) {
        match EventSpec::parse(spec) {
            EventSpec::Native { kind, selector } => {
                if let Some(ctx) = self.ctx() {
                    ctx.bindings
                        .borrow_mut()
                        .unbind(self.node(), kind, &selector, handler);
                }
            }
            EventSpec::Custom(name) => {
                let mut handlers = self.inner.handlers.borrow_mut();
                match handler {
                    Some(handler) => {
                        if let Some(list) = handlers.get_mut(&name)
                            && let Some(pos) = list.iter().position(|h| h.ptr_eq(handler))
                        {
                            list.remove(pos);
                        }
                    }
                    None => {
                        handlers.remove(&name);
                    }
                }
            }
        }
    }

    /// Raise the custom event `name`.
    ///
    /// Handlers run in subscription order over a snapshot taken up front, so
    /// subscribing or unsubscribing from inside a handler affects the next
    /// trigger only. Does nothing once the block is destroyed.
    pub fn trigger(&self, name: &str, params: Option<&dyn Any>) {
        if self.lifecycle() == Lifecycle::Destroyed {
            return;
        }
        let snapshot = self
            .inner
            .handlers
            .borrow()
            .get(name)
            .cloned()
            .unwrap_or_default();
        let args = EventArgs::Custom { name, params };
        for handler in &snapshot {
            handler.call(self, &args);
        }
    }

    /// Tear the block down: drop the handlers its class declared, unbind its
    /// local listeners and evict it from the cache. Calling it again does nothing.
    ///
    /// The node is left in the document, marker included.
    pub fn destroy(&self) {
        if self.lifecycle() == Lifecycle::Destroyed {
            return;
        }
        self.inner.lifecycle.set(Lifecycle::Destroyed);
        let declared = core::mem::replace(
            &mut *self.inner.declared.borrow_mut(),
            Declared {
                custom: Vec::new(),
                bindings: Vec::new(),
            },
        );
        {
            let mut handlers = self.inner.handlers.borrow_mut();
            for (name, wrapper) in &declared.custom {
                if let Some(list) = handlers.get_mut(name)
                    && let Some(pos) = list.iter().position(|h| h.ptr_eq(wrapper))
                {
                    list.remove(pos);
                }
            }
        }
        if let Some(ctx) = self.ctx() {
            ctx.bindings.borrow_mut().unbind_ids(&declared.bindings);
            let evicted = ctx.registry.borrow_mut().evict(self);
            drop(evicted);
        }
        tracing::debug!(class = %self.name(), id = %self.id(), "destroyed block");
    }

    /// Remove the hidden class and trigger `show`.
    pub fn show(&self) {
        if let Some(ctx) = self.ctx() {
            ctx.dom
                .borrow_mut()
                .remove_class(self.node(), &ctx.settings.hidden_class);
        }
        self.trigger("show", None);
    }

    /// Add the hidden class and trigger `hide`.
    pub fn hide(&self) {
        if let Some(ctx) = self.ctx() {
            ctx.dom
                .borrow_mut()
                .add_class(self.node(), &ctx.settings.hidden_class);
        }
        self.trigger("hide", None);
    }

    /// Returns true if the node carries the hidden class.
    pub fn is_hidden(&self) -> bool {
        self.ctx().is_some_and(|ctx| {
            ctx.dom
                .borrow()
                .has_class(self.node(), &ctx.settings.hidden_class)
        })
    }

    /// Blocks on every marked descendant, all classes per node, in document order.
    pub fn children(&self) -> Result<Vec<Self>, Error> {
        let Some(ctx) = self.ctx() else {
            return Ok(Vec::new());
        };
        let selector = format!("[{}]", ctx.settings.marker_attribute);
        let nodes = ctx.dom.borrow().query_all(self.node(), &selector);
        let blocks = Blocks::from_context(ctx);
        let mut children = Vec::new();
        for node in nodes {
            children.extend(blocks.blocks(node)?);
        }
        Ok(children)
    }

    /// The data attribute `key` (`data-nb-<key>` by default).
    pub fn data(&self, key: &str) -> Option<String> {
        let ctx = self.ctx()?;
        ctx.attribute(self.node(), &data_attribute(&ctx.settings, key)?)
    }

    /// Set the data attribute `key`. An empty key is ignored.
    pub fn set_data(&self, key: &str, value: &str) {
        let Some(ctx) = self.ctx() else {
            return;
        };
        if let Some(name) = data_attribute(&ctx.settings, key) {
            ctx.dom.borrow_mut().set_attribute(self.node(), &name, value);
        }
    }

    /// Remove the data attribute `key`.
    pub fn remove_data(&self, key: &str) {
        let Some(ctx) = self.ctx() else {
            return;
        };
        if let Some(name) = data_attribute(&ctx.settings, key) {
            ctx.dom.borrow_mut().remove_attribute(self.node(), &name);
        }
    }

    /// Every data attribute, keys without the prefix, in document order.
    pub fn data_all(&self) -> Vec<(String, String)> {
        let Some(ctx) = self.ctx() else {
            return Vec::new();
        };
        let attrs = ctx.dom.borrow().attributes(self.node());
        attrs
            .into_iter()
            .filter_map(|(name, value)| {
                let key = name.strip_prefix(ctx.settings.data_prefix.as_str())?;
                (!key.is_empty()).then(|| (key.to_string(), value))
            })
            .collect()
    }

    /// The value of modifier `name`: `Some("")` for a bare flag class.
    pub fn get_mod(&self, name: &str) -> Option<String> {
        let ctx = self.ctx()?;
        let classes = ctx.dom.borrow().classes(self.node());
        classes.into_iter().find_map(|class| mod_value(&class, name))
    }

    /// Set modifier `name`, replacing any previous value. An empty value sets
    /// the bare flag class.
    pub fn set_mod(&self, name: &str, value: &str) {
        self.del_mod(name);
        if let Some(ctx) = self.ctx() {
            let class = if value.is_empty() {
                name.to_string()
            } else {
                format!("{name}_{value}")
            };
            ctx.dom.borrow_mut().add_class(self.node(), &class);
        }
    }

    /// Remove modifier `name`.
    pub fn del_mod(&self, name: &str) {
        let Some(ctx) = self.ctx() else {
            return;
        };
        let classes = ctx.dom.borrow().classes(self.node());
        let mut dom = ctx.dom.borrow_mut();
        for class in classes.iter().filter(|c| mod_value(c, name).is_some()) {
            dom.remove_class(self.node(), class);
        }
    }

    /// Invoke the class method `method`. `None` when the class has no such method.
    pub fn call(&self, method: &str, params: Option<&dyn Any>) -> Option<Outcome> {
        let handler = self.inner.class.method(method)?.clone();
        Some(handler.call(
            self,
            &EventArgs::Custom {
                name: method,
                params,
            },
        ))
    }

    /// Run `f` on the per-instance state.
    ///
    /// `None` when the class declares no state, the state is not a `T`, or the
    /// state is already borrowed further up the stack.
    pub fn with_state<T: 'static, R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let mut state = self.inner.state.try_borrow_mut().ok()?;
        let state = state.as_mut()?.downcast_mut::<T>()?;
        Some(f(state))
    }

    /// Number of subscriptions to the custom event `name`.
    pub fn subscriptions(&self, name: &str) -> usize {
        self.inner
            .handlers
            .borrow()
            .get(name)
            .map_or(0, Vec::len)
    }
}

fn data_attribute(settings: &Settings, key: &str) -> Option<String> {
    (!key.is_empty()).then(|| format!("{}{key}", settings.data_prefix))
}

fn mod_value(class: &str, name: &str) -> Option<String> {
    let rest = class.strip_prefix(name)?;
    if rest.is_empty() {
        return Some(String::new());
    }
    rest.strip_prefix('_').map(ToString::to_string)
}
