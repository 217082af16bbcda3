// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types: event kinds and their traits, event spec parsing, native events,
//! handler outcomes and dispatch results.
//!
//! ## Overview
//!
//! These types describe the vocabulary shared by class definitions, blocks and
//! the [`dispatch`](crate::dispatch) walk. Event specs are plain strings such as
//! `"click"`, `"click .close"` or `"opened"`; [`EventSpec::parse`] decides whether
//! a spec names a native event (optionally narrowed by a selector) or a custom one.

use alloc::string::{String, ToString};

use bitflags::bitflags;
use kurbo::Point;

bitflags! {
    /// Delivery traits of a native [`EventKind`].
    #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
    pub struct EventTraits: u8 {
        /// The event bubbles from the target through its ancestors.
        const BUBBLES = 1 << 0;
        /// The event is delivered to listeners bound on a block's own node,
        /// never through the document-level delegated listener.
        const LOCAL = 1 << 1;
        /// One half of the hover pair; carries a related node.
        const HOVER = 1 << 2;
    }
}

/// The closed allow-list of native event kinds.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum EventKind {
    /// `click`
    Click,
    /// `dblclick`
    DblClick,
    /// `mouseup`
    MouseUp,
    /// `mousedown`
    MouseDown,
    /// `keydown`
    KeyDown,
    /// `keypress`
    KeyPress,
    /// `keyup`
    KeyUp,
    /// `input`
    Input,
    /// `change`
    Change,
    /// `blur`; local-only and non-bubbling.
    Blur,
    /// `mouseover`; pointer entered a node.
    MouseOver,
    /// `mouseout`; pointer left a node.
    MouseOut,
    /// `focusin`
    FocusIn,
    /// `focusout`
    FocusOut,
}

impl EventKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 14] = [
        Self::Click,
        Self::DblClick,
        Self::MouseUp,
        Self::MouseDown,
        Self::KeyDown,
        Self::KeyPress,
        Self::KeyUp,
        Self::Input,
        Self::Change,
        Self::Blur,
        Self::MouseOver,
        Self::MouseOut,
        Self::FocusIn,
        Self::FocusOut,
    ];

    /// The DOM name of this kind.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::DblClick => "dblclick",
            Self::MouseUp => "mouseup",
            Self::MouseDown => "mousedown",
            Self::KeyDown => "keydown",
            Self::KeyPress => "keypress",
            Self::KeyUp => "keyup",
            Self::Input => "input",
            Self::Change => "change",
            Self::Blur => "blur",
            Self::MouseOver => "mouseover",
            Self::MouseOut => "mouseout",
            Self::FocusIn => "focusin",
            Self::FocusOut => "focusout",
        }
    }

    /// Look up a kind by its exact DOM name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    /// Delivery traits of this kind.
    pub const fn traits(self) -> EventTraits {
        match self {
            Self::Blur => EventTraits::LOCAL,
            Self::MouseOver | Self::MouseOut => EventTraits::BUBBLES.union(EventTraits::HOVER),
            _ => EventTraits::BUBBLES,
        }
    }

    /// Returns true if the event bubbles.
    pub const fn bubbles(self) -> bool {
        self.traits().contains(EventTraits::BUBBLES)
    }

    /// Returns true for kinds bound per block node instead of delegated.
    pub const fn is_local(self) -> bool {
        self.traits().contains(EventTraits::LOCAL)
    }

    /// Returns true for `mouseover` and `mouseout`.
    pub const fn is_hover(self) -> bool {
        self.traits().contains(EventTraits::HOVER)
    }
}

impl core::fmt::Display for EventKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// A parsed event spec.
///
/// A spec is either `type` or `type selector`, where `type` is one of the
/// [`EventKind`] names followed by a word boundary. Everything else is the name
/// of a custom event, so a typo such as `"clik"` silently becomes a custom event.
///
/// ```
/// use thicket_blocks::types::{EventKind, EventSpec};
///
/// assert_eq!(
///     EventSpec::parse("click .close"),
///     EventSpec::Native { kind: EventKind::Click, selector: ".close".into() },
/// );
/// assert_eq!(EventSpec::parse("opened"), EventSpec::Custom("opened".into()));
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EventSpec {
    /// A native event, with a possibly empty selector.
    Native {
        /// The event kind.
        kind: EventKind,
        /// Selector narrowing the node the handler fires for; empty means the
        /// block node itself.
        selector: String,
    },
    /// A custom event name.
    Custom(String),
}

impl EventSpec {
    /// Classify `spec`.
    pub fn parse(spec: &str) -> Self {
        for kind in EventKind::ALL {
            let Some(rest) = spec.strip_prefix(kind.name()) else {
                continue;
            };
            let boundary = rest
                .chars()
                .next()
                .is_none_or(|c| !(c.is_ascii_alphanumeric() || c == '_'));
            if boundary {
                return Self::Native {
                    kind,
                    selector: rest.trim().to_string(),
                };
            }
        }
        Self::Custom(spec.to_string())
    }
}

/// A native event as delivered to [`Blocks::dispatch`](crate::blocks::Blocks::dispatch).
///
/// The host (a browser binding, a test, a demo) builds these and hands them to
/// the context; the framework never synthesizes native events itself.
#[derive(Clone, Debug, PartialEq)]
pub struct NativeEvent<N> {
    /// The event kind.
    pub kind: EventKind,
    /// The node the event originated at.
    pub target: N,
    /// For hover kinds, the node the pointer came from or went to.
    pub related: Option<N>,
    /// Pointer button; `0` is the primary button.
    pub button: u16,
    /// Pointer position, when the event has one.
    pub point: Option<Point>,
    /// Key name for keyboard events.
    pub key: Option<String>,
}

impl<N> NativeEvent<N> {
    /// Create an event of `kind` at `target` with the primary button and no extras.
    pub fn new(kind: EventKind, target: N) -> Self {
        Self {
            kind,
            target,
            related: None,
            button: 0,
            point: None,
            key: None,
        }
    }

    /// Builder: set the related node.
    #[must_use]
    pub fn with_related(mut self, related: N) -> Self {
        self.related = Some(related);
        self
    }

    /// Builder: set the pointer button.
    #[must_use]
    pub fn with_button(mut self, button: u16) -> Self {
        self.button = button;
        self
    }

    /// Builder: set the pointer position.
    #[must_use]
    pub fn at(mut self, point: Point) -> Self {
        self.point = Some(point);
        self
    }

    /// Builder: set the key name.
    #[must_use]
    pub fn with_key(mut self, key: &str) -> Self {
        self.key = Some(key.to_string());
        self
    }
}

/// Handler outcome controlling chain execution and bubbling.
///
/// Handlers may return `()` (continue), a `bool` (`false` halts), or an
/// `Outcome` directly.
///
/// ```
/// use thicket_blocks::types::Outcome;
///
/// assert_eq!(Outcome::from(()), Outcome::CONTINUE);
/// assert_eq!(Outcome::from(false), Outcome::HALT);
/// assert!(Outcome::HALT_CHAIN.halt_chain && !Outcome::HALT_CHAIN.halt_bubble);
/// ```
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Outcome {
    /// Skip the remaining handlers of the current chain.
    pub halt_chain: bool,
    /// Stop the walk to outer blocks once the current block is done.
    pub halt_bubble: bool,
}

impl Outcome {
    /// Keep going.
    pub const CONTINUE: Self = Self {
        halt_chain: false,
        halt_bubble: false,
    };
    /// Stop this chain only.
    pub const HALT_CHAIN: Self = Self {
        halt_chain: true,
        halt_bubble: false,
    };
    /// Stop this chain and stop bubbling.
    pub const HALT: Self = Self {
        halt_chain: true,
        halt_bubble: true,
    };
}

impl From<()> for Outcome {
    fn from((): ()) -> Self {
        Self::CONTINUE
    }
}

impl From<bool> for Outcome {
    fn from(keep_going: bool) -> Self {
        if keep_going { Self::CONTINUE } else { Self::HALT }
    }
}

/// How far a dispatched native event travelled.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Propagation {
    /// The delegated listener declined the event (non-primary click).
    Ignored,
    /// The walk reached the root.
    Completed,
    /// A handler halted bubbling.
    Stopped,
    /// A hover event with a related node stopped after the innermost block.
    Truncated,
}
