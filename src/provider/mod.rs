// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Wallet Providers
//!
//! A provider is the communication channel to a connected wallet, modelled
//! after EIP-1193: a single `request(method, params)` entry point plus a
//! stream of push events.
//!
//! ## Implementations
//!
//! - [`LocalWalletProvider`] - in-process wallet backed by a local secp256k1 key
//! - [`RpcWalletProvider`] - forwards requests to a JSON-RPC node over HTTP
//!
//! Providers are handed out by a [`WalletSelector`]; [`ProviderSelector`] is
//! the registry used by the server.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::broadcast;

pub mod error;
pub mod http;
pub mod local;
pub mod selector;

#[cfg(test)]
pub(crate) mod testing;

pub use error::WalletError;
pub use http::{RpcProviderFactory, RpcWalletProvider};
pub use local::LocalWalletProvider;
pub use selector::{ProviderFactory, ProviderSelector, WalletSelector};

/// Capacity of each provider's push-event channel.
pub const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Events pushed by a provider without a preceding request.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderEvent {
    /// `accountsChanged`: the exposed accounts, first one active.
    AccountsChanged(Vec<String>),
    /// `chainChanged`: the new chain id, hex string or number.
    ChainChanged(Value),
    /// `disconnect`: the provider can no longer serve requests.
    Disconnect { code: i64, message: String },
}

/// An EIP-1193 style wallet provider.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Identifier of the selector option this provider came from.
    fn id(&self) -> &str;

    /// Issue a JSON-RPC request with positional parameters.
    async fn request(&self, method: &str, params: Value) -> Result<Value, WalletError>;

    /// Subscribe to push events. Dropping the receiver unsubscribes.
    fn subscribe(&self) -> broadcast::Receiver<ProviderEvent>;
}

/// Shared handle to a connected provider.
pub type ProviderHandle = Arc<dyn WalletProvider>;
