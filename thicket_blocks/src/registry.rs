// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Class registry, wired kinds, id counter and the instance cache.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::block::Block;
use crate::class::BlockClass;
use crate::dom::Dom;
use crate::error::Error;
use crate::types::EventKind;

pub(crate) struct Registry<D: Dom> {
    classes: BTreeMap<String, Rc<BlockClass<D>>>,
    wired: BTreeSet<EventKind>,
    counter: u64,
    /// node id → class name → live instance
    cache: BTreeMap<String, BTreeMap<String, Block<D>>>,
}

impl<D: Dom> Registry<D> {
    pub(crate) fn new() -> Self {
        Self {
            classes: BTreeMap::new(),
            wired: BTreeSet::new(),
            counter: 0,
            cache: BTreeMap::new(),
        }
    }

    /// Next value of the counter shared by generated ids and anonymous class names.
    pub(crate) fn next_id(&mut self) -> u64 {
        let id = self.counter;
        self.counter += 1;
        id
    }

    pub(crate) fn class(&self, name: &str) -> Result<Rc<BlockClass<D>>, Error> {
        self.classes
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownClass(name.to_string()))
    }

    pub(crate) fn contains_class(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Register `class` and wire every delegated kind it introduces.
    pub(crate) fn register(&mut self, class: BlockClass<D>) -> Result<Rc<BlockClass<D>>, Error> {
        if self.classes.contains_key(class.name()) {
            return Err(Error::DuplicateClass(class.name().to_string()));
        }
        for kind in class.dom_kinds() {
            if self.wired.insert(kind) {
                tracing::debug!(event = kind.name(), "installed delegated listener");
            }
        }
        let class = Rc::new(class);
        self.classes
            .insert(class.name().to_string(), Rc::clone(&class));
        Ok(class)
    }

    pub(crate) fn is_wired(&self, kind: EventKind) -> bool {
        self.wired.contains(&kind)
    }

    pub(crate) fn cached(&self, id: &str, class: &str) -> Option<Block<D>> {
        self.cache.get(id)?.get(class).cloned()
    }

    /// Make sure a cache slot exists for `id`; returns true if it was just created.
    pub(crate) fn open_slot(&mut self, id: &str) -> bool {
        if self.cache.contains_key(id) {
            return false;
        }
        self.cache.insert(id.to_string(), BTreeMap::new());
        true
    }

    pub(crate) fn insert(&mut self, block: &Block<D>) {
        self.cache
            .entry(block.id().to_string())
            .or_default()
            .insert(block.name().to_string(), block.clone());
    }

    /// Drop `block` from the cache if it is the cached instance for its pair.
    pub(crate) fn evict(&mut self, block: &Block<D>) -> Option<Block<D>> {
        let slot = self.cache.get_mut(block.id())?;
        if !slot.get(block.name()).is_some_and(|b| b.ptr_eq(block)) {
            return None;
        }
        let evicted = slot.remove(block.name());
        if slot.is_empty() {
            self.cache.remove(block.id());
        }
        evicted
    }

    pub(crate) fn has_block(&self, id: &str, class: Option<&str>) -> bool {
        match (self.cache.get(id), class) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(slot), Some(class)) => slot.contains_key(class),
        }
    }

    /// Live instances on the node with `id`, by class name.
    pub(crate) fn blocks_on(&self, id: &str) -> Vec<Block<D>> {
        self.cache
            .get(id)
            .map(|slot| slot.values().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(all(test, feature = "document_adapter"))]
mod tests {
    use super::*;
    use crate::class::ClassSpec;
    use thicket_dom::Document;

    fn class(name: &str, spec: ClassSpec<Document>) -> BlockClass<Document> {
        match BlockClass::define(name.into(), spec, None) {
            Ok(c) => c,
            Err(err) => panic!("{err}"),
        }
    }

    #[test]
    fn counter_is_monotonic() {
        let mut reg: Registry<Document> = Registry::new();
        assert_eq!(reg.next_id(), 0);
        assert_eq!(reg.next_id(), 1);
        assert_eq!(reg.next_id(), 2);
    }

    #[test]
    fn registering_wires_each_kind_once() {
        let mut reg: Registry<Document> = Registry::new();
        assert!(!reg.is_wired(EventKind::Click));
        let a = class("a", ClassSpec::named("a").on("click", |_, _| ()));
        assert!(reg.register(a).is_ok());
        assert!(reg.is_wired(EventKind::Click));
        let b = class(
            "b",
            ClassSpec::named("b")
                .on("click .x", |_, _| ())
                .on("blur", |_, _| ()),
        );
        assert!(reg.register(b).is_ok());
        assert!(!reg.is_wired(EventKind::Blur), "local kinds are never delegated");
        assert!(reg.contains_class("b"));
    }

    #[test]
    fn duplicate_and_unknown_names_are_errors() {
        let mut reg: Registry<Document> = Registry::new();
        assert!(reg.register(class("a", ClassSpec::named("a"))).is_ok());
        assert_eq!(
            reg.register(class("a", ClassSpec::named("a"))).err(),
            Some(Error::DuplicateClass("a".into()))
        );
        assert_eq!(reg.class("zzz").err(), Some(Error::UnknownClass("zzz".into())));
    }

    #[test]
    fn slots_track_first_use() {
        let mut reg: Registry<Document> = Registry::new();
        assert!(!reg.has_block("n1", None));
        assert!(reg.open_slot("n1"));
        assert!(!reg.open_slot("n1"));
        assert!(reg.has_block("n1", None));
        assert!(!reg.has_block("n1", Some("popup")));
    }
}
