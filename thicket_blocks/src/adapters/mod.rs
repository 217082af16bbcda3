// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapters to integrate with document implementations.
//!
//! Enabled via feature flags so the core stays free of any concrete document.

#[cfg(feature = "document_adapter")]
pub mod document;
