// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Thicket Blocks: components bound to document nodes, with delegated events.
//!
//! A *block* is a component instance attached to an element that names its
//! class in a marker attribute (`data-nb` by default). Classes declare what
//! they react to with event specs:
//!
//! - `"click"`: a native event on the block node itself;
//! - `"click .close"`: a native event on a descendant matching `.close`;
//! - `"opened"`: a custom event raised with [`Block::trigger`](block::Block::trigger).
//!
//! Native events are not bound per block. One delegated listener per event kind
//! receives the event at the document level, walks from the target up, creates
//! blocks lazily at every boundary it crosses and runs the matching chains.
//! Classes inherit and merge their event tables; derived handlers run before
//! base handlers, and any handler can stop its chain or stop the bubbling.
//!
//! ## API overview
//!
//! - [`blocks::Blocks`]: the application context. Defines classes, creates
//!   and finds blocks, dispatches native events, and owns the global *space*.
//! - [`class::ClassSpec`] / [`class::BlockClass`]: class declaration and the
//!   merged result.
//! - [`block::Block`]: a live instance with its own custom event bus.
//! - [`dom::Dom`]: the document collaborator; [`dom::Settings`] names the
//!   attributes and classes the framework uses.
//! - [`types`]: event kinds, specs, native events and handler outcomes.
//! - [`hover`]: enter/leave emulation for `mouseover` / `mouseout`.
//!
//! ## Minimal usage
//!
//! ```
//! use thicket_blocks::blocks::Blocks;
//! use thicket_blocks::class::ClassSpec;
//! use thicket_blocks::types::{EventKind, NativeEvent, Propagation};
//! use thicket_dom::{Document, Element};
//!
//! let mut doc = Document::new();
//! let root = doc.root();
//! let popup = doc.insert(
//!     Some(root),
//!     Element::new("div").with_id("p1").with_attr("data-nb", "popup"),
//! );
//! let close = doc.insert(Some(popup), Element::new("span").with_class("close"));
//!
//! let blocks = Blocks::new(doc).unwrap();
//! blocks
//!     .define(
//!         ClassSpec::named("popup")
//!             .method("close", |block, _| block.hide())
//!             .on_method("click .close", "close"),
//!     )
//!     .unwrap();
//!
//! let seen = blocks.dispatch(&NativeEvent::new(EventKind::Click, close)).unwrap();
//! assert_eq!(seen, Propagation::Completed);
//! let block = blocks.find("p1").unwrap().unwrap();
//! assert!(block.is_hidden());
//! ```
//!
//! ## Features
//!
//! - `std` (default): forwards `std` to dependencies.
//! - `libm`: floating point support for `kurbo` without `std`.
//! - `document_adapter` (default): [`dom::Dom`] for `thicket_dom::Document`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod adapters;
pub mod block;
pub mod blocks;
pub mod class;
pub mod dom;
pub mod error;
pub mod handler;
pub mod hover;
pub mod types;

mod bindings;
mod dispatch;
mod registry;

#[cfg(all(test, feature = "document_adapter"))]
mod testing;
