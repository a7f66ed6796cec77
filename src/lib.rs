// SPDX-License-Identifier: MPL-2.0
//! `lang_bootstrap` selects the active UI language for an embedded
//! control-panel page and dispatches its translation resource scripts
//! exactly once per page lifetime.
//!
//! Resolution reads the page environment through a small capability trait
//! (URL parameter, header preference attribute, reported locale); loading
//! injects one script per catalog either into the live parse stream or,
//! after parsing, via sequentially appended script elements. A shared
//! completion signal settles once every resource has been attempted,
//! regardless of individual failures.

#![doc(html_root_url = "https://docs.rs/lang_bootstrap/0.1.0")]

pub mod config;
pub mod error;
pub mod host;
pub mod lang;
pub mod loader;
pub mod page;
pub mod registry;
