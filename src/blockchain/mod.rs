// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Chain integration module.
//!
//! This module provides:
//! - A typed chain-RPC client over a wallet provider handle
//! - The static table of networks a wallet can be asked to add
//! - Wallet key loading for the local provider

pub mod client;
pub mod signing;
pub mod types;

pub use client::ChainClient;
pub use types::*;
