/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! tabshell: a multi-tab browser shell core.
//!
//! The crate owns the mapping from logical tab identity to an embedded
//! content surface, enforces the at-most-one-visible-surface invariant,
//! routes navigation commands to the correct surface, and relays surface
//! lifecycle events back into tab state. The embedded-browser engine
//! itself is consumed only through the traits in [`engine`]; a
//! deterministic reference implementation lives in [`headless`].

pub mod app;
pub mod comms;
pub mod engine;
pub mod headless;
pub mod parser;
pub mod prefs;
pub mod shell;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
