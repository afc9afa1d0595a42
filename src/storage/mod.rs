// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Local Storage Module
//!
//! Persistent state kept between process runs. Only the cached provider
//! preference lives here; session state itself is never persisted.
//!
//! ## Storage Layout
//!
//! ```text
//! .wallet-session/         # or the parent of WALLET_CACHE_PATH
//!   cached-provider.json   # Last selected provider option
//! ```

pub mod paths;
pub mod preference;

pub use paths::StoragePaths;
pub use preference::{PreferenceError, PreferenceStore};
