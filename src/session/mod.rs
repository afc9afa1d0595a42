// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Wallet Session
//!
//! Connection lifecycle, network switching and message signing for one
//! user, driven by a [`WalletSelector`](crate::provider::WalletSelector).
//!
//! - `controller` - [`WalletSession`] and its operations
//! - `state` - the records the controller guards
//! - `subscription` - provider push-event forwarding
//! - `view` - derived display state

pub mod controller;
pub mod state;
pub mod subscription;
pub mod view;

pub use controller::{Outcome, WalletSession};
pub use state::{Connection, Session, SigningState};
pub use subscription::EventSubscription;
pub use view::{network_label, network_options, truncate_address};
