// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Enter/leave highlighting on a menu built from `mouseover` / `mouseout`.
//!
//! Moving the pointer between an item and its own label does not re-enter the
//! item, and hover events stop at the innermost block.
//!
//! Run:
//! - `cargo run -p thicket_demos --example hover_menu`

use kurbo::Point;
use thicket_blocks::adapters::document::pointer_transition;
use thicket_blocks::blocks::Blocks;
use thicket_blocks::class::ClassSpec;
use thicket_dom::{Document, Element};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut doc = Document::new();
    let root = doc.root();
    let menu = doc.insert(
        Some(root),
        Element::new("ul").with_id("menu").with_attr("data-nb", "menu"),
    );
    let first = doc.insert(Some(menu), Element::new("li").with_class("item"));
    let label = doc.insert(Some(first), Element::new("span").with_class("label"));
    let second = doc.insert(Some(menu), Element::new("li").with_class("item"));

    let blocks = Blocks::new(doc).expect("space");
    blocks
        .define(
            ClassSpec::named("menu")
                .on("mouseover .item", |block, args| {
                    if let Some(node) = args.node() {
                        block.set_mod("hot", "yes");
                        tracing::info!(?node, point = ?args.point(), "enter");
                    }
                })
                .on("mouseout .item", |block, args| {
                    if let Some(node) = args.node() {
                        block.del_mod("hot");
                        tracing::info!(?node, point = ?args.point(), "leave");
                    }
                }),
        )
        .expect("menu");

    let moves = [
        (Some(menu), first, Point::new(12.0, 4.0)),
        (Some(first), label, Point::new(20.0, 6.0)),
        (Some(label), first, Point::new(48.0, 6.0)),
        (Some(first), second, Point::new(20.0, 30.0)),
        (Some(second), menu, Point::new(90.0, 30.0)),
    ];
    for (from, to, at) in moves {
        for event in pointer_transition(from, to, at) {
            let outcome = blocks.dispatch(&event).expect("dispatch");
            println!("  {} {:?} -> {outcome:?}", event.kind, event.target);
        }
    }

    let menu = blocks.find("menu").expect("lookup").expect("menu block");
    assert_eq!(menu.get_mod("hot"), None);
}
