// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet Session Gateway - wallet connection state over HTTP
//!
//! This crate keeps the session of a browser-style wallet connection: which
//! provider is connected, the active account and network, network switching
//! with an add-chain fallback, and personal message signing and verification.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `blockchain` - chain-RPC client, network table, key loading
//! - `provider` - EIP-1193 style wallet providers and the provider selector
//! - `session` - the session controller and its derived view
//! - `storage` - cached provider preference

pub mod api;
pub mod blockchain;
pub mod config;
pub mod error;
pub mod models;
pub mod provider;
pub mod session;
pub mod state;
pub mod storage;
pub mod telemetry;
