// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A popup with a close button, opened from a link.
//!
//! Shows class inheritance, method handlers, custom events and the space.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p thicket_demos --example popup`

use kurbo::Point;
use thicket_blocks::blocks::Blocks;
use thicket_blocks::class::ClassSpec;
use thicket_blocks::handler::Handler;
use thicket_blocks::types::{EventKind, NativeEvent, Outcome, Propagation};
use thicket_dom::{Document, Element, NodeId};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // <html>
    //   <a id="open" data-nb="opener" data-nb-target="popup1" class="_init">Open</a>
    //   <div id="popup1" data-nb="popup" class="_hidden">
    //     <span class="close">×</span>
    //   </div>
    // </html>
    let mut doc = Document::new();
    let root = doc.root();
    let opener = doc.insert(
        Some(root),
        Element::new("a")
            .with_id("open")
            .with_attr("data-nb", "opener")
            .with_attr("data-nb-target", "popup1")
            .with_class("_init"),
    );
    let popup = doc.insert(
        Some(root),
        Element::new("div")
            .with_id("popup1")
            .with_attr("data-nb", "popup")
            .with_class("_hidden"),
    );
    let close = doc.insert(Some(popup), Element::new("span").with_class("close"));

    let blocks = Blocks::new(doc).expect("space");

    blocks
        .define(
            ClassSpec::named("toggle")
                .method("open", |block, _| block.show())
                .method("close", |block, _| block.hide()),
        )
        .expect("toggle");
    blocks
        .define(
            ClassSpec::named("popup")
                .extends("toggle")
                .on_method("click .close", "close")
                .on("hide", |block, _| println!("popup {} closed", block.id()))
                .on("show", |block, _| println!("popup {} opened", block.id())),
        )
        .expect("popup");
    blocks
        .define(ClassSpec::named("opener").on("click", |block, _| {
            let Some(ctx) = block.context() else {
                return Outcome::CONTINUE;
            };
            if let Some(target) = block.data("target")
                && let Ok(Some(popup)) = ctx.find(&target)
            {
                popup.call("open", None);
            }
            // The link must not reach the space.
            Outcome::HALT
        }))
        .expect("opener");

    blocks.on(
        "space:click",
        Handler::<Document>::new(|_, args| {
            if let Some(node) = args.params::<NodeId>() {
                println!("space saw a click on {node:?}");
            }
        }),
    );

    let created = blocks.init(None).expect("init");
    tracing::info!(
        blocks = ?created.iter().map(|b| b.name()).collect::<Vec<_>>(),
        "auto-initialized"
    );

    let click = |node| {
        let event = NativeEvent::new(EventKind::Click, node).at(Point::new(10.0, 10.0));
        blocks.dispatch(&event).expect("dispatch")
    };

    assert_eq!(click(opener), Propagation::Stopped);
    let popup_block = blocks.find("popup1").expect("lookup").expect("popup block");
    assert!(!popup_block.is_hidden());

    assert_eq!(click(close), Propagation::Completed);
    assert!(popup_block.is_hidden());
}
