// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JSON-RPC node provider.
//!
//! Forwards every request to a node (anvil, hardhat, geth with unlocked
//! accounts, ...) over HTTP. Nodes do not push wallet events, so the event
//! channel stays silent.

use std::borrow::Cow;
use std::fmt;

use alloy::{
    network::Ethereum,
    providers::{
        fillers::{BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller},
        Identity, Provider, ProviderBuilder, RootProvider,
    },
};
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::broadcast;
use url::Url;

use super::selector::ProviderFactory;
use super::{ProviderEvent, ProviderHandle, WalletError, WalletProvider, EVENT_CHANNEL_CAPACITY};

/// HTTP provider type (with all fillers).
type HttpProvider = FillProvider<
    JoinFill<
        Identity,
        JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
    >,
    RootProvider<Ethereum>,
>;

/// Wallet provider backed by a JSON-RPC node.
pub struct RpcWalletProvider {
    id: String,
    url: Url,
    provider: HttpProvider,
    events: broadcast::Sender<ProviderEvent>,
}

impl RpcWalletProvider {
    /// Default selector option id.
    pub const ID: &'static str = "rpc";

    pub fn new(url: Url) -> Self {
        let provider = ProviderBuilder::new().connect_http(url.clone());
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            id: Self::ID.to_string(),
            url,
            provider,
            events,
        }
    }

    /// The node endpoint.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl WalletProvider for RpcWalletProvider {
    fn id(&self) -> &str {
        &self.id
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value, WalletError> {
        tracing::debug!(method, url = %self.url, "Forwarding wallet request");
        self.provider
            .raw_request::<_, Value>(Cow::Owned(method.to_string()), params)
            .await
            .map_err(|e| match e.as_error_resp() {
                Some(payload) => WalletError::rpc(payload.code, payload.message.to_string()),
                None => WalletError::Transport(e.to_string()),
            })
    }

    fn subscribe(&self) -> broadcast::Receiver<ProviderEvent> {
        self.events.subscribe()
    }
}

impl fmt::Debug for RpcWalletProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcWalletProvider")
            .field("id", &self.id)
            .field("url", &self.url.as_str())
            .finish()
    }
}

/// Creates a fresh [`RpcWalletProvider`] on every connect.
#[derive(Debug, Clone)]
pub struct RpcProviderFactory {
    url: Url,
}

impl RpcProviderFactory {
    pub fn new(url: Url) -> Self {
        Self { url }
    }
}

#[async_trait]
impl ProviderFactory for RpcProviderFactory {
    async fn create(&self) -> Result<ProviderHandle, WalletError> {
        Ok(std::sync::Arc::new(RpcWalletProvider::new(self.url.clone())))
    }
}
