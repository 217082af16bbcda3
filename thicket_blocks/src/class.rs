// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Block classes: definition, inheritance, composition and instantiation.
//!
//! ## Event tables
//!
//! A class owns one or more [`EventLayer`]s. A plain class has exactly one; a
//! mixin built with [`Blocks::compose`](crate::blocks::Blocks::compose) has one
//! per part, each dispatched independently. Every layer sorts its entries into
//! three tables:
//!
//! - `dom`: delegated native kinds, keyed by kind then by selector;
//! - `local`: native kinds bound on the block node itself (`blur`);
//! - `custom`: everything else, keyed by event name.
//!
//! Tables are merged with the base class when the class is defined. The merged
//! chain for a key is the base's handlers followed by the class's own, and chains
//! run last-to-first, so a derived class handles an event before its base.
//! [`ClassSpec::suppress`] drops the inherited part of one key.

use alloc::boxed::Box;
use alloc::collections::{BTreeMap, BTreeSet};
use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;
use core::hash::{BuildHasherDefault, Hasher};

use indexmap::IndexMap;

use crate::block::Block;
use crate::blocks::Context;
use crate::dom::{Dom, Settings};
use crate::error::Error;
use crate::handler::{EventArgs, Handler};
use crate::types::{EventKind, EventSpec, Outcome};

type StateFn = Rc<dyn Fn() -> Box<dyn Any>>;

/// An insertion-ordered string-keyed table.
pub type Table<V> = IndexMap<String, V, BuildHasherDefault<KeyHasher>>;

/// FNV-1a hasher for [`Table`] keys, available without `std`.
#[derive(Copy, Clone, Debug)]
pub struct KeyHasher(u64);

impl Default for KeyHasher {
    fn default() -> Self {
        Self(0xcbf2_9ce4_8422_2325)
    }
}

impl Hasher for KeyHasher {
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.0 = (self.0 ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3);
        }
    }
}

/// The handler chain under one key.
pub struct Slot<D: Dom> {
    handlers: Vec<Handler<D>>,
    overrides: bool,
}

impl<D: Dom> Slot<D> {
    /// Handlers in chain order; the last one runs first.
    pub fn handlers(&self) -> &[Handler<D>] {
        &self.handlers
    }
}

impl<D: Dom> Default for Slot<D> {
    fn default() -> Self {
        Self {
            handlers: Vec::new(),
            overrides: false,
        }
    }
}

impl<D: Dom> Clone for Slot<D> {
    fn clone(&self) -> Self {
        Self {
            handlers: self.handlers.clone(),
            overrides: self.overrides,
        }
    }
}

impl<D: Dom> fmt::Debug for Slot<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot")
            .field("handlers", &self.handlers.len())
            .field("overrides", &self.overrides)
            .finish()
    }
}

/// Chain lookup on a table of slots.
pub trait SlotTable<D: Dom> {
    /// Handlers under `key`, empty when absent.
    fn handlers(&self, key: &str) -> &[Handler<D>];
}

impl<D: Dom> SlotTable<D> for Table<Slot<D>> {
    fn handlers(&self, key: &str) -> &[Handler<D>] {
        self.get(key).map(Slot::handlers).unwrap_or(&[])
    }
}

fn slot_mut<'t, D: Dom>(table: &'t mut Table<Slot<D>>, key: &str) -> &'t mut Slot<D> {
    table.entry(key.to_string()).or_default()
}

fn inherit_slots<D: Dom>(table: &mut Table<Slot<D>>, base: &Table<Slot<D>>) {
    for (key, base_slot) in base {
        let slot = slot_mut(table, key);
        if !slot.overrides {
            let own = core::mem::take(&mut slot.handlers);
            slot.handlers = base_slot.handlers.clone();
            slot.handlers.extend(own);
        }
    }
}

/// Selector-keyed chains for one native kind.
pub type Selectors<D> = Table<Slot<D>>;

/// One independently dispatched set of event tables.
pub struct EventLayer<D: Dom> {
    dom: BTreeMap<EventKind, Selectors<D>>,
    local: BTreeMap<EventKind, Selectors<D>>,
    custom: Table<Slot<D>>,
}

impl<D: Dom> EventLayer<D> {
    /// Delegated chains for `kind`.
    pub fn dom(&self, kind: EventKind) -> Option<&Selectors<D>> {
        self.dom.get(&kind)
    }

    /// Chains for a local kind.
    pub fn local(&self, kind: EventKind) -> Option<&Selectors<D>> {
        self.local.get(&kind)
    }

    /// Custom event chains.
    pub fn custom(&self) -> &Table<Slot<D>> {
        &self.custom
    }

    /// Delegated kinds with at least one entry.
    pub fn dom_kinds(&self) -> impl Iterator<Item = EventKind> + '_ {
        self.dom.keys().copied()
    }

    fn inherit(&mut self, base: &Self) {
        for (kind, selectors) in &base.dom {
            inherit_slots(self.dom.entry(*kind).or_default(), selectors);
        }
        for (kind, selectors) in &base.local {
            inherit_slots(self.local.entry(*kind).or_default(), selectors);
        }
        inherit_slots(&mut self.custom, &base.custom);
    }

    fn local_entries(&self) -> impl Iterator<Item = (EventKind, &str, &Slot<D>)> {
        self.local
            .iter()
            .flat_map(|(kind, sel)| sel.iter().map(move |(s, slot)| (*kind, s.as_str(), slot)))
    }
}

impl<D: Dom> Default for EventLayer<D> {
    fn default() -> Self {
        Self {
            dom: BTreeMap::new(),
            local: BTreeMap::new(),
            custom: Table::default(),
        }
    }
}

impl<D: Dom> Clone for EventLayer<D> {
    fn clone(&self) -> Self {
        Self {
            dom: self.dom.clone(),
            local: self.local.clone(),
            custom: self.custom.clone(),
        }
    }
}

impl<D: Dom> fmt::Debug for EventLayer<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventLayer")
            .field("dom", &self.dom)
            .field("local", &self.local)
            .field("custom", &self.custom)
            .finish()
    }
}

enum Entry<D: Dom> {
    Handler(Handler<D>),
    Method(String),
    Suppress,
}

/// Declarative description of a block class, consumed by
/// [`Blocks::define`](crate::blocks::Blocks::define).
///
/// Event entries keep their declaration order; for delegated kinds that order
/// is the order selectors are tried on each node.
///
/// ```
/// use thicket_blocks::class::ClassSpec;
/// use thicket_blocks::types::Outcome;
/// use thicket_dom::Document;
///
/// let spec: ClassSpec<Document> = ClassSpec::named("popup")
///     .method("close", |block, _| block.hide())
///     .on_method("click .close", "close")
///     .on("init", |_, _| Outcome::CONTINUE);
/// assert_eq!(spec.name(), Some("popup"));
/// ```
pub struct ClassSpec<D: Dom> {
    name: Option<String>,
    base: Option<String>,
    methods: Vec<(String, Handler<D>)>,
    state: Option<StateFn>,
    events: Vec<(String, Entry<D>)>,
}

impl<D: Dom> ClassSpec<D> {
    /// An anonymous class; it is named `<id_prefix><n>` when defined.
    pub fn anonymous() -> Self {
        Self {
            name: None,
            base: None,
            methods: Vec::new(),
            state: None,
            events: Vec::new(),
        }
    }

    /// A named class.
    pub fn named(name: &str) -> Self {
        let mut spec = Self::anonymous();
        spec.name = Some(name.to_string());
        spec
    }

    /// The declared name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The declared base class name, if any.
    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    /// Inherit from the class registered as `base`.
    #[must_use]
    pub fn extends(mut self, base: &str) -> Self {
        self.base = Some(base.to_string());
        self
    }

    /// Add a method. Methods override inherited ones of the same name.
    #[must_use]
    pub fn method<F, R>(mut self, name: &str, f: F) -> Self
    where
        F: Fn(&Block<D>, &EventArgs<'_, D::Node>) -> R + 'static,
        R: Into<Outcome>,
    {
        self.methods.push((name.to_string(), Handler::new(f)));
        self
    }

    /// Per-instance state, built for every new block.
    #[must_use]
    pub fn state<T: 'static>(mut self, init: impl Fn() -> T + 'static) -> Self {
        self.state = Some(Rc::new(move || Box::new(init()) as Box<dyn Any>));
        self
    }

    /// Handle the event `spec` with a closure.
    #[must_use]
    pub fn on<F, R>(self, spec: &str, f: F) -> Self
    where
        F: Fn(&Block<D>, &EventArgs<'_, D::Node>) -> R + 'static,
        R: Into<Outcome>,
    {
        self.on_handler(spec, Handler::new(f))
    }

    /// Handle the event `spec` with an existing handler.
    #[must_use]
    pub fn on_handler(mut self, spec: &str, handler: Handler<D>) -> Self {
        self.events.push((spec.to_string(), Entry::Handler(handler)));
        self
    }

    /// Handle the event `spec` with the method `method`, resolved when the class
    /// is defined.
    #[must_use]
    pub fn on_method(mut self, spec: &str, method: &str) -> Self {
        self.events
            .push((spec.to_string(), Entry::Method(method.to_string())));
        self
    }

    /// Drop the handlers inherited for `spec`. Handlers this class declares for
    /// the same spec are kept.
    #[must_use]
    pub fn suppress(mut self, spec: &str) -> Self {
        self.events.push((spec.to_string(), Entry::Suppress));
        self
    }
}

impl<D: Dom> fmt::Debug for ClassSpec<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassSpec")
            .field("name", &self.name)
            .field("base", &self.base)
            .field("events", &self.events.len())
            .finish_non_exhaustive()
    }
}

/// A defined block class: merged event layers, methods and state constructor.
pub struct BlockClass<D: Dom> {
    name: String,
    base: Option<String>,
    methods: BTreeMap<String, Handler<D>>,
    state: Option<StateFn>,
    layers: Vec<EventLayer<D>>,
}

impl<D: Dom> BlockClass<D> {
    /// Build a class from `spec`, merging with `base` when given.
    pub(crate) fn define(
        name: String,
        spec: ClassSpec<D>,
        base: Option<&Self>,
    ) -> Result<Self, Error> {
        let mut methods = base.map(|b| b.methods.clone()).unwrap_or_default();
        methods.extend(spec.methods);

        let mut own = EventLayer::default();
        for (event, entry) in spec.events {
            let slot = match EventSpec::parse(&event) {
                EventSpec::Native { kind, selector } if kind.is_local() => {
                    slot_mut(own.local.entry(kind).or_default(), &selector)
                }
                EventSpec::Native { kind, selector } => {
                    slot_mut(own.dom.entry(kind).or_default(), &selector)
                }
                EventSpec::Custom(event) => slot_mut(&mut own.custom, &event),
            };
            match entry {
                Entry::Handler(handler) => slot.handlers.push(handler),
                Entry::Method(method) => {
                    let handler = methods.get(&method).ok_or_else(|| Error::UnknownMethod {
                        class: name.clone(),
                        method: method.clone(),
                    })?;
                    slot.handlers.push(handler.clone());
                }
                Entry::Suppress => slot.overrides = true,
            }
        }

        let layers = match base.map(|b| b.layers.split_first()) {
            Some(Some((first, rest))) => {
                own.inherit(first);
                let mut layers = Vec::with_capacity(rest.len() + 1);
                layers.push(own);
                layers.extend(rest.iter().cloned());
                layers
            }
            _ => alloc::vec![own],
        };

        Ok(Self {
            state: spec.state.or_else(|| base.and_then(|b| b.state.clone())),
            base: spec.base,
            name,
            methods,
            layers,
        })
    }

    /// Build a mixin from `parts`, in order.
    pub(crate) fn compose(name: String, parts: &[Rc<Self>]) -> Self {
        let mut methods = BTreeMap::new();
        for part in parts {
            methods.extend(part.methods.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        Self {
            name,
            base: None,
            methods,
            state: parts.iter().find_map(|p| p.state.clone()),
            layers: parts
                .iter()
                .flat_map(|p| p.layers.iter().cloned())
                .collect(),
        }
    }

    /// The class name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The base class name.
    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    /// Event layers in dispatch order.
    pub fn layers(&self) -> &[EventLayer<D>] {
        &self.layers
    }

    /// A method by name, own or inherited.
    pub fn method(&self, name: &str) -> Option<&Handler<D>> {
        self.methods.get(name)
    }

    /// Delegated kinds any layer handles.
    pub fn dom_kinds(&self) -> BTreeSet<EventKind> {
        self.layers.iter().flat_map(EventLayer::dom_kinds).collect()
    }

    /// Instantiate this class on `node`, or return the live instance.
    ///
    /// The instance is cached before its `init` handlers run, so a handler that
    /// asks for the block on the same node receives this instance.
    pub(crate) fn create(
        self: &Rc<Self>,
        ctx: &Rc<Context<D>>,
        node: D::Node,
        extra: &[(&str, Handler<D>)],
    ) -> Block<D> {
        let id = ctx.ensure_id(node);
        let first_for_node = {
            let mut registry = ctx.registry.borrow_mut();
            if let Some(block) = registry.cached(&id, &self.name) {
                return block;
            }
            registry.open_slot(&id)
        };
        if first_for_node {
            let marked = Settings::class_names(ctx.attribute(node, &ctx.settings.marker_attribute));
            if marked.is_none() {
                ctx.dom
                    .borrow_mut()
                    .set_attribute(node, &ctx.settings.marker_attribute, &self.name);
            }
        }

        let state = self.state.as_ref().map(|make| make());
        let block = Block::new(Rc::clone(self), ctx, id, node, state);
        ctx.registry.borrow_mut().insert(&block);
        tracing::debug!(class = %self.name, id = %block.id(), "created block");

        let mut declared = Vec::new();
        let mut bindings = Vec::new();
        for layer in &self.layers {
            for (event, slot) in layer.custom.iter() {
                if slot.handlers.is_empty() {
                    continue;
                }
                let wrapper = crate::handler::chain(&slot.handlers);
                block.subscribe(event, wrapper.clone());
                declared.push((event.clone(), wrapper));
            }
            for (kind, selector, slot) in layer.local_entries() {
                if slot.handlers.is_empty() {
                    continue;
                }
                let wrapper = crate::handler::chain(&slot.handlers);
                bindings.push(ctx.bindings.borrow_mut().bind(
                    block.clone(),
                    node,
                    kind,
                    selector,
                    wrapper,
                ));
            }
        }
        block.record_declared(declared, bindings);
        block.init(extra);
        block
    }
}

impl<D: Dom> fmt::Debug for BlockClass<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockClass")
            .field("name", &self.name)
            .field("base", &self.base)
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .field("layers", &self.layers)
            .finish_non_exhaustive()
    }
}
