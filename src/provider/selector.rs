// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Provider selection.
//!
//! [`ProviderSelector`] is the registry of wallet options the user can pick
//! from. It is constructed once at startup and shared by the session.
//!
//! ## Resolution Order
//!
//! 1. Explicit choice passed to `connect`
//! 2. Cached preference from the last successful connect
//! 3. Configured default option
//! 4. The only registered option, if there is exactly one

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use super::{LocalWalletProvider, ProviderHandle, RpcProviderFactory, RpcWalletProvider, WalletError};
use crate::blockchain::signing::{signer_from_hex, signer_from_pem_file};
use crate::config::{AppConfig, KeySource};
use crate::storage::PreferenceStore;

/// Produces a provider handle for one selector option.
#[async_trait]
pub trait ProviderFactory: Send + Sync {
    async fn create(&self) -> Result<ProviderHandle, WalletError>;
}

/// A long-lived provider handed out on every connect.
#[async_trait]
impl ProviderFactory for ProviderHandle {
    async fn create(&self) -> Result<ProviderHandle, WalletError> {
        Ok(Arc::clone(self))
    }
}

/// Hands out provider handles and remembers the user's choice.
#[async_trait]
pub trait WalletSelector: Send + Sync {
    /// Resolve a provider, optionally forcing a specific option.
    async fn connect(&self, choice: Option<&str>) -> Result<ProviderHandle, WalletError>;

    /// Forget the cached choice.
    async fn clear_cached_preference(&self) -> Result<(), WalletError>;

    /// The cached choice, if any.
    fn cached_preference(&self) -> Option<String>;
}

/// Registry of named provider options.
#[derive(Default)]
pub struct ProviderSelector {
    options: BTreeMap<String, Arc<dyn ProviderFactory>>,
    default_choice: Option<String>,
    /// `None` disables caching.
    preferences: Option<PreferenceStore>,
}

impl ProviderSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an option.
    pub fn with_option(mut self, id: impl Into<String>, factory: Arc<dyn ProviderFactory>) -> Self {
        self.options.insert(id.into(), factory);
        self
    }

    /// Option used when neither an explicit nor a cached choice exists.
    pub fn with_default(mut self, id: impl Into<String>) -> Self {
        self.default_choice = Some(id.into());
        self
    }

    /// Persist successful choices in `store`.
    pub fn with_cache(mut self, store: PreferenceStore) -> Self {
        self.preferences = Some(store);
        self
    }

    /// Build the selector described by `config`.
    ///
    /// The local wallet is always registered; the RPC option only when an
    /// endpoint is configured.
    pub fn from_config(config: &AppConfig) -> Result<Self, WalletError> {
        let signer = match &config.key {
            KeySource::Hex(hex) => signer_from_hex(hex)?,
            KeySource::PemFile(path) => signer_from_pem_file(path)?,
            KeySource::Random => {
                tracing::warn!("No wallet key configured, generating an ephemeral key");
                alloy::signers::local::PrivateKeySigner::random()
            }
        };
        let local: ProviderHandle = Arc::new(LocalWalletProvider::new(signer, config.chain_id));
        let mut selector = Self::new().with_option(LocalWalletProvider::ID, Arc::new(local));

        if let Some(url) = &config.rpc_url {
            tracing::info!(url = %url, "Registering JSON-RPC wallet provider");
            selector = selector.with_option(
                RpcWalletProvider::ID,
                Arc::new(RpcProviderFactory::new(url.clone())),
            );
        }
        if let Some(default) = &config.default_provider {
            selector = selector.with_default(default.clone());
        }
        if let Some(path) = &config.cache_path {
            selector = selector.with_cache(PreferenceStore::new(path.clone()));
        }
        Ok(selector)
    }

    /// Registered option ids, sorted.
    pub fn options(&self) -> Vec<String> {
        self.options.keys().cloned().collect()
    }

    fn resolve(&self, choice: Option<&str>) -> Result<String, WalletError> {
        if let Some(choice) = choice {
            return if self.options.contains_key(choice) {
                Ok(choice.to_string())
            } else {
                Err(WalletError::UnknownProvider(choice.to_string()))
            };
        }

        if let Some(cached) = self.cached_preference() {
            if self.options.contains_key(&cached) {
                return Ok(cached);
            }
            tracing::warn!(provider = %cached, "Cached provider is no longer registered, ignoring");
        }

        if let Some(default) = &self.default_choice {
            if self.options.contains_key(default) {
                return Ok(default.clone());
            }
            return Err(WalletError::UnknownProvider(default.clone()));
        }

        match self.options.keys().collect::<Vec<_>>().as_slice() {
            [only] => Ok((*only).clone()),
            [] => Err(WalletError::Selection(
                "No wallet provider is available".to_string(),
            )),
            _ => Err(WalletError::Selection(
                "Several wallet providers are available; choose one".to_string(),
            )),
        }
    }
}

#[async_trait]
impl WalletSelector for ProviderSelector {
    async fn connect(&self, choice: Option<&str>) -> Result<ProviderHandle, WalletError> {
        let id = self.resolve(choice)?;
        let factory = self
            .options
            .get(&id)
            .ok_or_else(|| WalletError::UnknownProvider(id.clone()))?;
        let provider = factory.create().await?;

        if let Some(store) = &self.preferences {
            if let Err(e) = store.save(&id) {
                tracing::warn!(provider = %id, error = %e, "Failed to cache provider preference");
            }
        }

        tracing::info!(provider = %id, "Wallet provider selected");
        Ok(provider)
    }

    async fn clear_cached_preference(&self) -> Result<(), WalletError> {
        match &self.preferences {
            Some(store) => store
                .clear()
                .map_err(|e| WalletError::Preference(e.to_string())),
            None => Ok(()),
        }
    }

    fn cached_preference(&self) -> Option<String> {
        let store = self.preferences.as_ref()?;
        match store.load() {
            Ok(cached) => cached,
            Err(e) => {
                tracing::warn!(path = %store.path().display(), error = %e, "Unreadable provider preference");
                None
            }
        }
    }
}
