// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core document implementation: structure, updates, queries.

use alloc::string::String;
use alloc::vec::Vec;

use crate::selector::Selector;
use crate::types::{Element, NodeId};

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// An element tree rooted at an `<html>` element.
///
/// Nodes live in generational slots. Nodes inserted without a parent are
/// detached: they exist and can be queried, but are not reachable from
/// [`Document::root`] and are skipped by [`Document::element_by_id`].
pub struct Document {
    nodes: Vec<Option<Node>>, // slots
    generations: Vec<u32>,    // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    root: NodeId,
}

impl core::fmt::Debug for Document {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        let free = self.free_list.len();
        f.debug_struct("Document")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &free)
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    element: Element,
}

impl Node {
    fn new(generation: u32, element: Element) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            element,
        }
    }
}

impl Document {
    /// Create a document holding only the `<html>` root element.
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            root: NodeId::new(0, 1),
        };
        doc.root = doc.insert(None, Element::new("html"));
        doc
    }

    /// The `<html>` root element.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Insert a new element as the last child of `parent` (or detached if `None`).
    ///
    /// A stale `parent` leaves the new node detached.
    pub fn insert(&mut self, parent: Option<NodeId>, element: Element) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, element));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId indices are 32-bit."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, element)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId indices are 32-bit."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        let id = NodeId::new(idx, generation);
        if let Some(p) = parent
            && self.is_alive(p)
        {
            self.link_parent(id, p);
        }
        id
    }

    /// Remove a node (and its subtree). The root cannot be removed.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) || id == self.root {
            return;
        }
        if let Some(parent) = self.parent_of(id) {
            self.unlink_parent(id, parent);
        }
        let children = self.children(id).to_vec();
        for child in children {
            self.remove(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Move `id` to the end of `new_parent`'s children, or detach it with `None`.
    ///
    /// Returns false (and changes nothing) if either id is stale, if `id` is the
    /// root, or if the move would put a node inside its own subtree.
    pub fn reparent(&mut self, id: NodeId, new_parent: Option<NodeId>) -> bool {
        if !self.is_alive(id) || id == self.root {
            return false;
        }
        if let Some(p) = new_parent
            && (!self.is_alive(p) || p == id || self.contains(id, p))
        {
            return false;
        }
        if let Some(parent) = self.parent_of(id) {
            self.unlink_parent(id, parent);
        }
        if let Some(p) = new_parent {
            self.link_parent(id, p);
        }
        true
    }

    /// Returns true if `id` refers to a live node.
    ///
    /// A `NodeId` is considered live if its slot exists and its generation matches
    /// the current generation stored in that slot.
    /// See [`NodeId`] docs for the generational semantics.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.slot(id).is_some()
    }

    /// Parent of `id`, or `None` for the root, detached nodes and stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.slot(id)?.parent
    }

    /// Children of `id` in document order (empty for stale ids).
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.slot(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// The element stored at `id`.
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.slot(id).map(|n| &n.element)
    }

    /// Tag name of `id`.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(Element::tag)
    }

    /// Attribute value of `id`.
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.attr(name)
    }

    /// Set an attribute; no-op for stale ids.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(n) = self.slot_mut(id) {
            n.element.set_attr(name, value);
        }
    }

    /// Remove an attribute, returning its previous value.
    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> Option<String> {
        self.slot_mut(id)?.element.remove_attr(name)
    }

    /// Returns true if the node's `class` attribute contains `class`.
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).is_some_and(|e| e.has_class(class))
    }

    /// Add a class token. Returns true if the token was added.
    pub fn add_class(&mut self, id: NodeId, class: &str) -> bool {
        self.slot_mut(id).is_some_and(|n| n.element.add_class(class))
    }

    /// Remove a class token. Returns true if the token was present.
    pub fn remove_class(&mut self, id: NodeId, class: &str) -> bool {
        self.slot_mut(id)
            .is_some_and(|n| n.element.remove_class(class))
    }

    /// Add `class` if absent, remove it if present. Returns the new state.
    pub fn toggle_class(&mut self, id: NodeId, class: &str) -> bool {
        if self.has_class(id, class) {
            self.remove_class(id, class);
            false
        } else {
            self.add_class(id, class)
        }
    }

    /// Returns true if `node` is a strict descendant of `ancestor`.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        if !self.is_alive(ancestor) {
            return false;
        }
        let mut cur = self.parent_of(node);
        while let Some(p) = cur {
            if p == ancestor {
                return true;
            }
            cur = self.parent_of(p);
        }
        false
    }

    /// Path from the topmost ancestor to `id` (inclusive).
    pub fn path_to_root(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.is_alive(id) {
            return out;
        }
        let mut cur = Some(id);
        while let Some(n) = cur {
            out.push(n);
            cur = self.parent_of(n);
        }
        out.reverse();
        out
    }

    /// Strict descendants of `id` in document (pre-)order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.children(n).iter().rev().copied());
        }
        out
    }

    /// First connected element (in document order) whose `id` attribute equals `id`.
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        if self.attr(self.root, "id") == Some(id) {
            return Some(self.root);
        }
        self.descendants(self.root)
            .into_iter()
            .find(|&n| self.attr(n, "id") == Some(id))
    }

    /// Returns true if `node` matches `selector`.
    ///
    /// Invalid selectors never match; the parse error is logged as a warning.
    pub fn matches(&self, node: NodeId, selector: &str) -> bool {
        match Selector::parse(selector) {
            Ok(sel) => sel.matches(self, node),
            Err(err) => {
                tracing::warn!(selector, %err, "ignoring invalid selector");
                false
            }
        }
    }

    /// Strict descendants of `scope` matching `selector`, in document order.
    pub fn query_all(&self, scope: NodeId, selector: &str) -> Vec<NodeId> {
        let sel = match Selector::parse(selector) {
            Ok(sel) => sel,
            Err(err) => {
                tracing::warn!(selector, %err, "ignoring invalid selector");
                return Vec::new();
            }
        };
        self.descendants(scope)
            .into_iter()
            .filter(|&n| sel.matches(self, n))
            .collect()
    }

    /// First strict descendant of `scope` matching `selector`.
    pub fn query(&self, scope: NodeId, selector: &str) -> Option<NodeId> {
        self.query_all(scope, selector).into_iter().next()
    }

    // --- internals ---

    fn slot(&self, id: NodeId) -> Option<&Node> {
        self.nodes
            .get(id.idx())?
            .as_ref()
            .filter(|n| n.generation == id.1)
    }

    fn slot_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn link_parent(&mut self, id: NodeId, parent: NodeId) {
        if let Some(p) = self.slot_mut(parent) {
            p.children.push(id);
        }
        if let Some(n) = self.slot_mut(id) {
            n.parent = Some(parent);
        }
    }

    fn unlink_parent(&mut self, id: NodeId, parent: NodeId) {
        if let Some(p) = self.slot_mut(parent) {
            p.children.retain(|c| *c != id);
        }
        if let Some(n) = self.slot_mut(id) {
            n.parent = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn div() -> Element {
        Element::new("div")
    }

    #[test]
    fn new_document_has_html_root() {
        let doc = Document::new();
        assert_eq!(doc.tag(doc.root()), Some("html"));
        assert_eq!(doc.parent_of(doc.root()), None);
        assert!(doc.children(doc.root()).is_empty());
    }

    #[test]
    fn liveness_insert_remove_reuse() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.insert(Some(root), div());
        assert!(doc.is_alive(a));

        // Remove child; id becomes stale.
        doc.remove(a);
        assert!(!doc.is_alive(a));
        assert!(doc.children(root).is_empty());

        // Reuse slot by inserting a new node; old id must remain stale; new id is live.
        let b = doc.insert(Some(root), div());
        assert!(doc.is_alive(b));
        assert!(!doc.is_alive(a));
        if a.0 == b.0 {
            assert!(b.1 > a.1, "generation must increase on reuse");
        }
        assert_eq!(doc.attr(a, "id"), None, "stale ids must not alias");
    }

    #[test]
    fn remove_drops_subtree_and_keeps_root() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.insert(Some(root), div());
        let b = doc.insert(Some(a), div());
        let c = doc.insert(Some(b), div());
        doc.remove(a);
        assert!(!doc.is_alive(b));
        assert!(!doc.is_alive(c));
        doc.remove(root);
        assert!(doc.is_alive(root), "root is never removed");
    }

    #[test]
    fn reparent_rejects_cycles() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.insert(Some(root), div());
        let b = doc.insert(Some(a), div());
        assert!(!doc.reparent(a, Some(b)), "cannot move a node under its own child");
        assert!(!doc.reparent(a, Some(a)));
        assert_eq!(doc.parent_of(b), Some(a));

        assert!(doc.reparent(b, Some(root)));
        assert_eq!(doc.children(root), &[a, b]);
        assert!(doc.reparent(b, None));
        assert_eq!(doc.parent_of(b), None);
        assert!(!doc.contains(root, b), "detached nodes are outside the tree");
    }

    #[test]
    fn contains_is_strict() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.insert(Some(root), div());
        let b = doc.insert(Some(a), div());
        assert!(doc.contains(root, b));
        assert!(doc.contains(a, b));
        assert!(!doc.contains(b, b));
        assert!(!doc.contains(b, a));
    }

    #[test]
    fn path_and_descendants_follow_document_order() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.insert(Some(root), div());
        let a1 = doc.insert(Some(a), div());
        let a2 = doc.insert(Some(a), div());
        let b = doc.insert(Some(root), div());
        let a1x = doc.insert(Some(a1), div());
        assert_eq!(doc.path_to_root(a1x), vec![root, a, a1, a1x]);
        assert_eq!(doc.descendants(root), vec![a, a1, a1x, a2, b]);
        assert!(doc.descendants(a1x).is_empty());
    }

    #[test]
    fn class_helpers_edit_the_class_attribute() {
        let mut doc = Document::new();
        let root = doc.root();
        let n = doc.insert(Some(root), div().with_class("a"));
        assert!(doc.add_class(n, "b"));
        assert_eq!(doc.attr(n, "class"), Some("a b"));
        assert!(!doc.toggle_class(n, "a"));
        assert_eq!(doc.attr(n, "class"), Some("b"));
        assert!(doc.toggle_class(n, "a"));
        assert!(doc.has_class(n, "a"));
    }

    #[test]
    fn element_by_id_skips_detached_nodes() {
        let mut doc = Document::new();
        let root = doc.root();
        let detached = doc.insert(None, div().with_id("x"));
        assert_eq!(doc.element_by_id("x"), None);
        let attached = doc.insert(Some(root), div().with_id("x"));
        assert_eq!(doc.element_by_id("x"), Some(attached));
        assert!(doc.reparent(detached, Some(root)));
        assert_eq!(doc.element_by_id("x"), Some(attached), "first in document order");
    }

    #[test]
    fn query_all_scopes_to_strict_descendants() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.insert(Some(root), div().with_class("_init"));
        let b = doc.insert(Some(a), div().with_class("_init"));
        let _c = doc.insert(Some(root), div());
        assert_eq!(doc.query_all(root, "._init"), vec![a, b]);
        assert_eq!(doc.query_all(a, "._init"), vec![b]);
        assert_eq!(doc.query(root, "div"), Some(a));
        assert!(doc.query_all(root, "[").is_empty(), "invalid selectors match nothing");
        assert!(!doc.matches(a, ":bad"));
    }
}
