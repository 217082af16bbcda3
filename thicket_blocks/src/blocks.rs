// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The application context: registry, document, bindings and the space block.
//!
//! ## Usage
//!
//! 1) Build a [`Blocks`] over a document with [`Blocks::new`].
//! 2) Define classes with [`Blocks::define`].
//! 3) Instantiate auto-init blocks with [`Blocks::init`], and feed native events
//!    to [`Blocks::dispatch`].
//!
//! ## Space
//!
//! Every context owns a *space* block bound to the document root. It is the
//! global channel: [`Blocks::on`], [`Blocks::off`] and [`Blocks::trigger`]
//! operate on it, every new block announces itself there as `inited:<node id>`,
//! and every primary click anywhere in the document is re-broadcast as
//! `space:click` with the target node as params.

use alloc::format;
use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::any::Any;
use core::cell::RefCell;
use core::fmt;

use crate::bindings::Bindings;
use crate::block::Block;
use crate::class::{BlockClass, ClassSpec};
use crate::dispatch::Dispatcher;
use crate::dom::{Dom, Settings};
use crate::error::Error;
use crate::handler::Handler;
use crate::registry::Registry;
use crate::types::{EventKind, NativeEvent, Propagation};

pub(crate) struct Context<D: Dom> {
    pub(crate) dom: RefCell<D>,
    pub(crate) settings: Settings,
    pub(crate) registry: RefCell<Registry<D>>,
    pub(crate) bindings: RefCell<Bindings<D>>,
    pub(crate) space: RefCell<Option<Block<D>>>,
}

impl<D: Dom> Context<D> {
    pub(crate) fn attribute(&self, node: D::Node, name: &str) -> Option<String> {
        self.dom.borrow().attribute(node, name)
    }

    pub(crate) fn matches(&self, node: D::Node, selector: &str) -> bool {
        self.dom.borrow().matches(node, selector)
    }

    pub(crate) fn class(&self, name: &str) -> Result<Rc<BlockClass<D>>, Error> {
        self.registry.borrow().class(name)
    }

    pub(crate) fn space(&self) -> Option<Block<D>> {
        self.space.borrow().clone()
    }

    /// The node's `id`, assigning `<id_prefix><n>` first when it has none.
    pub(crate) fn ensure_id(&self, node: D::Node) -> String {
        if let Some(id) = self.attribute(node, "id").filter(|id| !id.is_empty()) {
            return id;
        }
        let n = self.registry.borrow_mut().next_id();
        let id = format!("{}{n}", self.settings.id_prefix);
        self.dom.borrow_mut().set_attribute(node, "id", &id);
        id
    }

    fn class_names(&self, node: D::Node) -> Option<Vec<String>> {
        Settings::class_names(self.attribute(node, &self.settings.marker_attribute))
    }
}

/// Handle to a block context.
///
/// Clones share the same context. Handlers receive the context through
/// [`Block::context`] and may call back into any method here; no internal
/// borrow is held while a handler runs. The one exception is
/// [`with_dom`](Self::with_dom) / [`with_dom_mut`](Self::with_dom_mut): their
/// closures must not call back into the context.
pub struct Blocks<D: Dom> {
    ctx: Rc<Context<D>>,
}

impl<D: Dom> Clone for Blocks<D> {
    fn clone(&self) -> Self {
        Self {
            ctx: Rc::clone(&self.ctx),
        }
    }
}

impl<D: Dom> fmt::Debug for Blocks<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Blocks")
            .field("settings", &self.ctx.settings)
            .field("space", &self.ctx.space.borrow())
            .finish_non_exhaustive()
    }
}

impl<D: Dom> Blocks<D> {
    /// Create a context with default [`Settings`].
    pub fn new(dom: D) -> Result<Self, Error> {
        Self::with_settings(dom, Settings::default())
    }

    /// Create a context and its space block.
    pub fn with_settings(dom: D, settings: Settings) -> Result<Self, Error> {
        let blocks = Self {
            ctx: Rc::new(Context {
                dom: RefCell::new(dom),
                settings,
                registry: RefCell::new(Registry::new()),
                bindings: RefCell::new(Bindings::new()),
                space: RefCell::new(None),
            }),
        };
        let space_class = blocks.define(ClassSpec::anonymous().on("click", |space, args| {
            if let Some(event) = args.native() {
                space.trigger("space:click", Some(&event.target as &dyn Any));
            }
        }))?;
        let root = blocks.ctx.dom.borrow().root();
        let space = space_class.create(&blocks.ctx, root, &[]);
        tracing::debug!(id = %space.id(), class = %space.name(), "space ready");
        *blocks.ctx.space.borrow_mut() = Some(space);
        Ok(blocks)
    }

    pub(crate) fn from_context(ctx: Rc<Context<D>>) -> Self {
        Self { ctx }
    }

    /// The settings this context was built with.
    pub fn settings(&self) -> &Settings {
        &self.ctx.settings
    }

    /// The space block.
    pub fn space(&self) -> Option<Block<D>> {
        self.ctx.space()
    }

    /// Define a class. Anonymous specs are named `<id_prefix><n>`.
    pub fn define(&self, spec: ClassSpec<D>) -> Result<Rc<BlockClass<D>>, Error> {
        let name = match spec.name() {
            Some(name) => name.to_string(),
            None => {
                let n = self.ctx.registry.borrow_mut().next_id();
                format!("{}{n}", self.ctx.settings.id_prefix)
            }
        };
        if self.ctx.registry.borrow().contains_class(&name) {
            return Err(Error::DuplicateClass(name));
        }
        let base = match spec.base() {
            Some(base) => Some(self.ctx.class(base)?),
            None => None,
        };
        let class = BlockClass::define(name, spec, base.as_deref())?;
        tracing::debug!(class = %class.name(), base = ?class.base(), "defined class");
        self.ctx.registry.borrow_mut().register(class)
    }

    /// Define a mixin whose event layers are those of `parts`, in order.
    pub fn compose(&self, name: Option<&str>, parts: &[&str]) -> Result<Rc<BlockClass<D>>, Error> {
        let parts = parts
            .iter()
            .map(|part| self.ctx.class(part))
            .collect::<Result<Vec<_>, _>>()?;
        let name = match name {
            Some(name) => name.to_string(),
            None => {
                let n = self.ctx.registry.borrow_mut().next_id();
                format!("{}{n}", self.ctx.settings.id_prefix)
            }
        };
        let class = BlockClass::compose(name, &parts);
        tracing::debug!(class = %class.name(), layers = class.layers().len(), "composed class");
        self.ctx.registry.borrow_mut().register(class)
    }

    /// A defined class by name.
    pub fn class(&self, name: &str) -> Result<Rc<BlockClass<D>>, Error> {
        self.ctx.class(name)
    }

    /// The block of the first class named on `node`.
    ///
    /// Every class named on the node is instantiated, as with
    /// [`blocks`](Self::blocks). `Ok(None)` when the node has no marker.
    pub fn block(&self, node: D::Node) -> Result<Option<Block<D>>, Error> {
        Ok(self.blocks(node)?.into_iter().next())
    }

    /// The block of class `name` on `node`, created if needed, regardless of
    /// the node's marker.
    pub fn block_named(&self, node: D::Node, name: &str) -> Result<Block<D>, Error> {
        self.create(name, node, &[])
    }

    /// Blocks of every class named on `node`, created if needed.
    pub fn blocks(&self, node: D::Node) -> Result<Vec<Block<D>>, Error> {
        self.blocks_with(node, &[])
    }

    /// Like [`blocks`](Self::blocks), subscribing `extra` handlers on blocks
    /// created by this call.
    pub fn blocks_with(
        &self,
        node: D::Node,
        extra: &[(&str, Handler<D>)],
    ) -> Result<Vec<Block<D>>, Error> {
        let Some(names) = self.ctx.class_names(node) else {
            return Ok(Vec::new());
        };
        names
            .iter()
            .map(|name| -> Result<Block<D>, Error> {
                let class = self.ctx.class(name)?;
                Ok(class.create(&self.ctx, node, extra))
            })
            .collect()
    }

    /// Instantiate class `name` on `node`, or return the live instance.
    ///
    /// `extra` handlers are subscribed only when a new instance is created.
    pub fn create(
        &self,
        name: &str,
        node: D::Node,
        extra: &[(&str, Handler<D>)],
    ) -> Result<Block<D>, Error> {
        let class = self.ctx.class(name)?;
        Ok(class.create(&self.ctx, node, extra))
    }

    /// Returns true if `node` has a cache entry, for class `name` when given.
    pub fn has_block(&self, node: D::Node, name: Option<&str>) -> bool {
        let Some(id) = self.ctx.attribute(node, "id") else {
            return false;
        };
        self.ctx.registry.borrow().has_block(&id, name)
    }

    /// The block on the element with `id`.
    pub fn find(&self, id: &str) -> Result<Option<Block<D>>, Error> {
        let node = self.ctx.dom.borrow().element_by_id(id);
        match node {
            Some(node) => self.block(node),
            None => Ok(None),
        }
    }

    /// Subscribe to the space.
    pub fn on(&self, spec: &str, handler: Handler<D>) -> Handler<D> {
        match self.space() {
            Some(space) => space.on(spec, handler),
            None => handler,
        }
    }

    /// Unsubscribe from the space.
    pub fn off(&self, spec: &str, handler: Option<&Handler<D>>) {
        if let Some(space) = self.space() {
            space.off(spec, handler);
        }
    }

    /// Raise a custom event on the space.
    pub fn trigger(&self, name: &str, params: Option<&dyn Any>) {
        if let Some(space) = self.space() {
            space.trigger(name, params);
        }
    }

    fn auto_init_nodes(&self, scope: Option<D::Node>) -> Vec<D::Node> {
        let dom = self.ctx.dom.borrow();
        let scope = scope.unwrap_or_else(|| dom.root());
        let class = &self.ctx.settings.auto_init_class;
        let mut nodes = Vec::new();
        if dom.has_class(scope, class) {
            nodes.push(scope);
        }
        nodes.extend(dom.query_all(scope, &format!(".{class}")));
        nodes
    }

    /// Instantiate every class of every auto-init node in `scope` (the
    /// document when `None`), the scope node included.
    ///
    /// Returns the first block of each node.
    pub fn init(&self, scope: Option<D::Node>) -> Result<Vec<Block<D>>, Error> {
        let mut created = Vec::new();
        for node in self.auto_init_nodes(scope) {
            if let Some(block) = self.block(node)? {
                created.push(block);
            }
        }
        tracing::debug!(count = created.len(), "initialized blocks");
        Ok(created)
    }

    /// Destroy every live block on the auto-init nodes of `scope`.
    pub fn destroy(&self, scope: Option<D::Node>) {
        for node in self.auto_init_nodes(scope) {
            let Some(id) = self.ctx.attribute(node, "id") else {
                continue;
            };
            let live = self.ctx.registry.borrow().blocks_on(&id);
            for block in live {
                block.destroy();
            }
        }
    }

    /// Deliver a native event.
    pub fn dispatch(&self, event: &NativeEvent<D::Node>) -> Result<Propagation, Error> {
        Dispatcher::new(&self.ctx, event).run()
    }

    /// Returns true if a delegated listener exists for `kind`.
    pub fn is_wired(&self, kind: EventKind) -> bool {
        self.ctx.registry.borrow().is_wired(kind)
    }

    /// Read the document.
    pub fn with_dom<R>(&self, f: impl FnOnce(&D) -> R) -> R {
        f(&self.ctx.dom.borrow())
    }

    /// Mutate the document.
    pub fn with_dom_mut<R>(&self, f: impl FnOnce(&mut D) -> R) -> R {
        f(&mut self.ctx.dom.borrow_mut())
    }
}

#[cfg(all(test, feature = "document_adapter"))]
mod tests {
    use alloc::format;
    use alloc::rc::Rc;
    use alloc::string::{String, ToString};
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::{Cell, RefCell};

    use thicket_dom::{Document, Element, NodeId};

    use super::Blocks;
    use crate::block::{Block, Lifecycle};
    use crate::class::ClassSpec;
    use crate::error::Error;
    use crate::handler::{EventArgs, Handler};
    use crate::testing::{Log, Nested};
    use crate::types::Outcome;

    type Spec = ClassSpec<Document>;

    #[test]
    fn space_is_built_on_the_root() {
        let f = Nested::new("", "");
        let space = f.blocks.space().unwrap();
        assert_eq!(space.name(), "nb-0");
        assert_eq!(space.id(), "nb-1");
        let root = f.blocks.with_dom(|doc| doc.root());
        assert_eq!(space.node(), root);
        assert_eq!(
            f.blocks.with_dom(|doc| doc.attr(root, "data-nb").map(String::from)),
            Some("nb-0".into())
        );
    }

    #[test]
    fn creation_is_idempotent_and_announced_once() {
        let f = Nested::new("", "widget");
        let log = Log::default();
        let announced = Rc::new(Cell::new(0));
        let count = Rc::clone(&announced);
        f.blocks.on(
            "inited:inner",
            Handler::new(move |space, args: &EventArgs<'_, NodeId>| {
                assert_eq!(space.name(), "nb-0");
                let created: Option<String> =
                    args.params::<Block<Document>>().map(|b| b.name().into());
                assert_eq!(created, Some(String::from("widget")));
                count.set(count.get() + 1);
            }),
        );
        f.blocks
            .define(Spec::named("widget").on("init", log.note("init")))
            .unwrap();

        let a = f.blocks.block(f.inner).unwrap().unwrap();
        let b = f.blocks.block(f.inner).unwrap().unwrap();
        assert!(a.ptr_eq(&b));
        assert_eq!(a.lifecycle(), Lifecycle::Active);
        assert_eq!(log.take(), ["init"]);
        assert_eq!(announced.get(), 1);
    }

    #[test]
    fn ids_and_markers_are_assigned_on_first_use() {
        let mut doc = Document::new();
        let root = doc.root();
        let bare = doc.insert(Some(root), Element::new("div"));
        let blocks = Blocks::new(doc).unwrap();
        blocks.define(Spec::named("panel")).unwrap();

        assert_eq!(blocks.block(bare).unwrap().map(|b| b.id().to_string()), None);
        let panel = blocks.block_named(bare, "panel").unwrap();
        assert_eq!(panel.id(), "nb-2");
        assert_eq!(
            blocks.with_dom(|doc| doc.attr(bare, "data-nb").map(String::from)),
            Some("panel".into())
        );
        assert!(blocks.block(bare).unwrap().is_some_and(|b| b.ptr_eq(&panel)));
        assert!(blocks.find("nb-2").unwrap().is_some());
        assert!(blocks.find("missing").unwrap().is_none());
    }

    #[test]
    fn init_handlers_see_the_cached_instance() {
        let f = Nested::new("", "widget");
        let same = Rc::new(Cell::new(false));
        let flag = Rc::clone(&same);
        f.blocks
            .define(Spec::named("widget").on("init", move |block, _| {
                let ctx = block.context().unwrap();
                let again = ctx.block(block.node()).unwrap().unwrap();
                flag.set(again.ptr_eq(block));
            }))
            .unwrap();
        f.blocks.block(f.inner).unwrap();
        assert!(same.get());
    }

    #[test]
    fn custom_events_stay_on_their_instance() {
        let mut doc = Document::new();
        let root = doc.root();
        let one = doc.insert(Some(root), Element::new("div").with_attr("data-nb", "item"));
        let two = doc.insert(Some(root), Element::new("div").with_attr("data-nb", "item"));
        let blocks = Blocks::new(doc).unwrap();
        let log = Log::default();
        let sink = log.clone();
        blocks
            .define(Spec::named("item").on("ping", move |block, _| sink.push(block.id())))
            .unwrap();
        let one = blocks.block(one).unwrap().unwrap();
        let two = blocks.block(two).unwrap().unwrap();
        one.trigger("ping", None);
        assert_eq!(log.take(), [one.id()]);
        two.trigger("ping", None);
        assert_eq!(log.take(), [two.id()]);
        one.trigger("pong", None);
        assert!(log.take().is_empty());
    }

    #[test]
    fn unsubscribing_during_trigger_applies_next_time() {
        let f = Nested::new("", "widget");
        f.blocks.define(Spec::named("widget")).unwrap();
        let block = f.blocks.block(f.inner).unwrap().unwrap();
        let log = Log::default();

        let slot: Rc<RefCell<Option<Handler<Document>>>> = Rc::default();
        let me = Rc::clone(&slot);
        let first_log = log.clone();
        let first = block.on(
            "tick",
            Handler::new(move |block, _: &EventArgs<'_, NodeId>| {
                first_log.push("first");
                if let Some(me) = me.borrow().as_ref() {
                    block.off("tick", Some(me));
                }
            }),
        );
        *slot.borrow_mut() = Some(first);
        block.on("tick", Handler::new(log.note("second")));

        block.trigger("tick", None);
        assert_eq!(log.take(), ["first", "second"]);
        block.trigger("tick", None);
        assert_eq!(log.take(), ["second"]);
        assert_eq!(block.subscriptions("tick"), 1);

        block.off("tick", None);
        assert_eq!(block.subscriptions("tick"), 0);
    }

    #[test]
    fn params_reach_custom_handlers() {
        let f = Nested::new("", "widget");
        let got = Rc::new(Cell::new(0_u32));
        let sink = Rc::clone(&got);
        f.blocks
            .define(Spec::named("widget").on("resize", move |_, args| {
                assert_eq!(args.name(), "resize");
                sink.set(args.params::<u32>().copied().unwrap_or_default());
            }))
            .unwrap();
        let block = f.blocks.block(f.inner).unwrap().unwrap();
        block.trigger("resize", Some(&42_u32));
        assert_eq!(got.get(), 42);
    }

    #[test]
    fn destroy_is_idempotent_and_keeps_the_node() {
        let f = Nested::new("", "widget");
        let log = Log::default();
        f.blocks
            .define(
                Spec::named("widget")
                    .on("init", log.note("init"))
                    .on("opened", log.note("declared")),
            )
            .unwrap();
        let block = f.blocks.block(f.inner).unwrap().unwrap();
        block.on("opened", Handler::new(log.note("ad hoc")));
        assert_eq!(block.subscriptions("opened"), 2);

        block.destroy();
        assert_eq!(block.lifecycle(), Lifecycle::Destroyed);
        assert_eq!(block.subscriptions("opened"), 1, "only declared chains go");
        block.trigger("opened", None);
        block.destroy();
        assert_eq!(log.take(), ["init"]);
        assert!(!f.blocks.has_block(f.inner, Some("widget")));
        assert_eq!(
            f.blocks.with_dom(|doc| doc.attr(f.inner, "data-nb").map(String::from)),
            Some("widget".into())
        );

        let fresh = f.blocks.block(f.inner).unwrap().unwrap();
        assert!(!fresh.ptr_eq(&block));
        assert_eq!(log.take(), ["init"]);
        block.destroy();
        assert!(f.blocks.has_block(f.inner, Some("widget")), "a stale destroy evicts nothing");
    }

    #[test]
    fn init_and_destroy_scan_auto_init_nodes() {
        let mut doc = Document::new();
        let root = doc.root();
        let scope = doc.insert(
            Some(root),
            Element::new("section").with_attr("data-nb", "list").with_class("_init"),
        );
        let item = doc.insert(
            Some(scope),
            Element::new("div").with_attr("data-nb", "item").with_class("_init"),
        );
        doc.insert(Some(scope), Element::new("div").with_attr("data-nb", "item"));
        let blocks = Blocks::new(doc).unwrap();
        blocks.define(Spec::named("list")).unwrap();
        blocks.define(Spec::named("item")).unwrap();

        let created = blocks.init(Some(scope)).unwrap();
        let names: Vec<&str> = created.iter().map(Block::name).collect();
        assert_eq!(names, ["list", "item"]);
        assert!(blocks.has_block(item, Some("item")));

        blocks.destroy(None);
        assert!(created.iter().all(|b| b.lifecycle() == Lifecycle::Destroyed));
        assert!(!blocks.has_block(scope, None));
    }

    #[test]
    fn init_creates_every_class_on_a_node() {
        let mut doc = Document::new();
        let root = doc.root();
        let both = doc.insert(
            Some(root),
            Element::new("div")
                .with_id("both")
                .with_attr("data-nb", "first second")
                .with_class("_init"),
        );
        let blocks = Blocks::new(doc).unwrap();
        let log = Log::default();
        blocks.define(Spec::named("first").on("init", log.note("first init"))).unwrap();
        blocks.define(Spec::named("second").on("init", log.note("second init"))).unwrap();
        blocks.on("inited:both", Handler::new(log.note("inited")));

        let created = blocks.init(None).unwrap();
        assert_eq!(created.len(), 1, "one entry per node");
        assert_eq!(created[0].name(), "first");
        assert!(blocks.has_block(both, Some("first")));
        assert!(blocks.has_block(both, Some("second")));
        assert_eq!(log.take(), ["first init", "inited", "second init", "inited"]);

        let found = blocks.find("both").unwrap();
        assert!(found.is_some_and(|b| b.ptr_eq(&created[0])));
        assert!(log.take().is_empty(), "lookup reuses live instances");
    }

    #[test]
    fn definition_errors() {
        let f = Nested::new("", "");
        f.blocks.define(Spec::named("a")).unwrap();
        assert_eq!(
            f.blocks.define(Spec::named("a")).err(),
            Some(Error::DuplicateClass("a".into()))
        );
        assert_eq!(
            f.blocks.define(Spec::named("b").extends("zzz")).err(),
            Some(Error::UnknownClass("zzz".into()))
        );
        assert_eq!(
            f.blocks.define(Spec::named("c").on_method("click", "go")).err(),
            Some(Error::UnknownMethod {
                class: "c".into(),
                method: "go".into()
            })
        );
        assert_eq!(
            f.blocks.compose(None, &["a", "nope"]).err(),
            Some(Error::UnknownClass("nope".into()))
        );
        assert!(f.blocks.class("b").is_err(), "failed definitions are not registered");
    }

    #[test]
    fn anonymous_classes_share_the_id_counter() {
        let f = Nested::new("", "");
        let anon = f.blocks.define(Spec::anonymous()).unwrap();
        assert_eq!(anon.name(), "nb-2");
        let mix = f.blocks.compose(None, &["nb-2"]).unwrap();
        assert_eq!(mix.name(), "nb-3");
        assert!(f.blocks.class("nb-3").is_ok());
    }

    #[test]
    fn extra_handlers_apply_to_new_instances_only() {
        let f = Nested::new("", "first second");
        f.blocks.define(Spec::named("first")).unwrap();
        f.blocks.define(Spec::named("second")).unwrap();
        let log = Log::default();
        let extra = [("opened", Handler::new(log.note("extra")))];
        let blocks = f.blocks.blocks_with(f.inner, &extra).unwrap();
        assert_eq!(blocks.len(), 2);
        for block in &blocks {
            block.trigger("opened", None);
        }
        assert_eq!(log.take(), ["extra", "extra"]);

        f.blocks.blocks_with(f.inner, &extra).unwrap();
        assert_eq!(blocks[0].subscriptions("opened"), 1);
    }

    #[test]
    fn global_channel() {
        let f = Nested::new("", "");
        let log = Log::default();
        let h = f.blocks.on("news", Handler::new(log.note("news")));
        f.blocks.trigger("news", None);
        f.blocks.off("news", Some(&h));
        f.blocks.trigger("news", None);
        assert_eq!(log.take(), ["news"]);
    }

    #[test]
    fn show_hide_data_and_modifiers() {
        let f = Nested::new("", "widget");
        let log = Log::default();
        f.blocks
            .define(
                Spec::named("widget")
                    .on("show", log.note("show"))
                    .on("hide", log.note("hide")),
            )
            .unwrap();
        let block = f.blocks.block(f.inner).unwrap().unwrap();

        block.hide();
        assert!(block.is_hidden());
        block.show();
        assert!(!block.is_hidden());
        assert_eq!(log.take(), ["hide", "show"]);

        block.set_data("size", "l");
        block.set_data("", "ignored-key");
        let node = block.node();
        let bare = f.blocks.with_dom(|doc| doc.attr(node, "data-nb-").map(String::from));
        assert_eq!(bare, None, "an empty key writes nothing");
        assert_eq!(block.data(""), None);
        assert_eq!(block.data("size").as_deref(), Some("l"));
        assert_eq!(block.data_all(), [(String::from("size"), String::from("l"))]);
        block.remove_data("size");
        assert_eq!(block.data("size"), None);

        block.set_mod("theme", "dark");
        assert_eq!(block.get_mod("theme").as_deref(), Some("dark"));
        block.set_mod("theme", "light");
        assert_eq!(block.get_mod("theme").as_deref(), Some("light"));
        block.set_mod("active", "");
        assert_eq!(block.get_mod("active").as_deref(), Some(""));
        block.del_mod("theme");
        assert_eq!(block.get_mod("theme"), None);
        assert_eq!(
            f.blocks.with_dom(|doc| doc.attr(f.inner, "class").map(String::from)),
            Some("active".into())
        );
    }

    #[test]
    fn children_methods_and_state() {
        let mut doc = Document::new();
        let root = doc.root();
        let list = doc.insert(Some(root), Element::new("ul").with_attr("data-nb", "list"));
        for _ in 0..2 {
            let li = doc.insert(Some(list), Element::new("li").with_attr("data-nb", "item"));
            doc.insert(Some(li), Element::new("span"));
        }
        let blocks = Blocks::new(doc).unwrap();
        blocks
            .define(
                Spec::named("list")
                    .state(|| 0_u32)
                    .method("bump", |block, _| {
                        block.with_state(|n: &mut u32| *n += 1);
                        Outcome::HALT_CHAIN
                    }),
            )
            .unwrap();
        blocks.define(Spec::named("item")).unwrap();

        let list = blocks.block(list).unwrap().unwrap();
        let children = list.children().unwrap();
        let names: Vec<&str> = children.iter().map(Block::name).collect();
        assert_eq!(names, ["item", "item"]);

        assert_eq!(list.call("bump", None), Some(Outcome::HALT_CHAIN));
        list.call("bump", None);
        assert_eq!(list.with_state(|n: &mut u32| *n), Some(2));
        assert_eq!(list.with_state(|s: &mut String| s.len()), None);
        assert_eq!(list.call("missing", None), None);
        assert_eq!(children[0].with_state(|n: &mut u32| *n), None);
        let ids: Vec<String> = children.iter().map(|b| format!("{}", b.id())).collect();
        assert_eq!(ids, vec![String::from("nb-3"), String::from("nb-4")]);
    }
}
