// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors surfaced by the block registry and dispatcher.

use alloc::string::String;

use thiserror::Error;

/// Errors returned by [`Blocks`](crate::blocks::Blocks) operations.
///
/// All of these are programming errors (a marker attribute or API call naming a
/// class that was never defined, or a class definition referring to a method
/// it does not have). They are reported immediately and never retried.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A class name was looked up but never defined.
    #[error("block class `{0}` is not defined")]
    UnknownClass(String),
    /// A class with this name is already registered.
    #[error("block class `{0}` is already defined")]
    DuplicateClass(String),
    /// An event entry names a method the class (and its bases) does not have.
    #[error("class `{class}` refers to undefined method `{method}`")]
    UnknownMethod {
        /// The class being defined.
        class: String,
        /// The missing method name.
        method: String,
    },
}
