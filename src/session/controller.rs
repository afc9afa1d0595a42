// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet session controller.
//!
//! ## Lifecycle
//!
//! ```text
//! Disconnected --connect()--> Connected
//! Connected --disconnect() / provider disconnect--> Disconnected
//! Connected --accountsChanged / chainChanged--> Connected (fields only)
//! ```
//!
//! ## Failure Semantics
//!
//! Operations never return errors. Each external call is isolated; a
//! failure is stored in the single error slot and the operation leaves the
//! state as it was. Nothing is mutated before the last external call of an
//! operation has resolved.
//!
//! ## Concurrency
//!
//! The state lock is never held across an await. Concurrent `connect()`
//! calls are not serialised: the last one to resolve wins.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::state::{Connection, SessionState, SigningState};
use super::subscription::EventSubscription;
use super::view;
use crate::blockchain::{network_params, normalize_address, parse_chain_id, to_hex, ChainClient};
use crate::models::SessionView;
use crate::provider::{ProviderEvent, WalletError, WalletSelector};

/// What an operation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The operation ran to completion.
    Completed,
    /// Nothing to do, e.g. no wallet connected.
    Skipped,
    /// An external call failed; see `last_error`.
    Failed,
}

struct Inner {
    selector: Arc<dyn WalletSelector>,
    state: Mutex<SessionState>,
}

/// Controller owning the session of one user.
///
/// Cheap to clone; clones share the same session.
#[derive(Clone)]
pub struct WalletSession {
    inner: Arc<Inner>,
}

/// Non-owning reference held by event subscriptions.
#[derive(Clone)]
pub(crate) struct WeakSession(Weak<Inner>);

impl WeakSession {
    pub(crate) fn upgrade(&self) -> Option<WalletSession> {
        self.0.upgrade().map(|inner| WalletSession { inner })
    }
}

impl WalletSession {
    /// Create an empty session using `selector` to acquire providers.
    pub fn new(selector: Arc<dyn WalletSelector>) -> Self {
        Self {
            inner: Arc::new(Inner {
                selector,
                state: Mutex::new(SessionState::default()),
            }),
        }
    }

    /// Reconnect with the cached provider choice, if there is one.
    ///
    /// Meant to be awaited once at startup before serving users.
    pub async fn restore(&self) -> Outcome {
        match self.inner.selector.cached_preference() {
            Some(provider) => {
                tracing::info!(provider = %provider, "Restoring cached wallet session");
                self.connect().await
            }
            None => Outcome::Skipped,
        }
    }

    /// Connect using the selector's cached or default choice.
    pub async fn connect(&self) -> Outcome {
        self.connect_inner(None).await
    }

    /// Connect using a specific selector option.
    pub async fn connect_with(&self, provider: &str) -> Outcome {
        self.connect_inner(Some(provider)).await
    }

    async fn connect_inner(&self, choice: Option<&str>) -> Outcome {
        let provider = match self.inner.selector.connect(choice).await {
            Ok(provider) => provider,
            Err(e) => return self.record_failure("connect", e),
        };

        let client = ChainClient::new(provider.clone());
        let accounts = match client.accounts().await {
            Ok(accounts) => accounts,
            Err(e) => return self.record_failure("connect", e),
        };
        let chain_id = match client.chain_id().await {
            Ok(chain_id) => chain_id,
            Err(e) => return self.record_failure("connect", e),
        };

        let account = accounts.into_iter().next();
        let mut state = self.lock();
        state.session.connection = Some(Connection {
            client,
            provider_id: provider.id().to_string(),
            account: account.clone(),
            chain_id: Some(chain_id),
            connected_at: Utc::now(),
        });

        // At most one live subscription: replacing the handle stops the old one.
        let subscription = EventSubscription::spawn(&provider, self.downgrade());
        if let Some(previous) = state.subscription.replace(subscription) {
            previous.cancel();
        }

        tracing::info!(
            provider = %provider.id(),
            account = account.as_deref().unwrap_or("none"),
            chain_id,
            "Wallet connected"
        );
        Outcome::Completed
    }

    /// Forget the cached provider and reset the session.
    ///
    /// Always completes. A failure to clear the cached preference is
    /// recorded in the error slot but does not keep the session alive.
    pub async fn disconnect(&self) -> Outcome {
        let cleared = self.inner.selector.clear_cached_preference().await;

        let mut state = self.lock();
        if let Err(e) = cleared {
            tracing::warn!(error = %e, "Failed to clear cached wallet provider");
            state.last_error = Some(e);
        }
        state.reset();
        tracing::info!("Wallet disconnected");
        Outcome::Completed
    }

    /// Choose the network for the next `switch_network()`.
    pub fn select_pending_network(&self, chain_id: u64) {
        self.lock().session.pending_network = Some(chain_id);
    }

    /// Ask the wallet to switch to the pending network.
    ///
    /// When the wallet does not know the chain, exactly one add-chain
    /// request is sent and the switch itself is left for the user to retry.
    pub async fn switch_network(&self) -> Outcome {
        let (client, pending) = {
            let state = self.lock();
            (state.session.client().cloned(), state.session.pending_network)
        };
        let Some(client) = client else {
            return Outcome::Skipped;
        };
        let Some(chain_id) = pending else {
            return self.record_failure("switch_network", WalletError::NoPendingNetwork);
        };

        match client.switch_chain(chain_id).await {
            Ok(()) => {
                tracing::info!(chain_id, "Network switch requested");
                Outcome::Completed
            }
            Err(e) if e.is_chain_not_recognized() => {
                let hex = to_hex(chain_id);
                let Some(network) = network_params(&hex) else {
                    return self
                        .record_failure("switch_network", WalletError::UnsupportedNetwork(hex));
                };
                match client.add_chain(network).await {
                    Ok(()) => {
                        tracing::info!(chain_id, network = network.name, "Network added to wallet; switch again to use it");
                        Outcome::Completed
                    }
                    Err(e) => self.record_failure("add_network", e),
                }
            }
            Err(e) => self.record_failure("switch_network", e),
        }
    }

    /// Replace the message to sign.
    pub fn set_draft_message(&self, text: impl Into<String>) {
        self.lock().signing.draft_message = text.into();
    }

    /// Sign the draft message with the active account.
    pub async fn sign_message(&self) -> Outcome {
        let (client, account, message, epoch) = {
            let state = self.lock();
            (
                state.session.client().cloned(),
                state.session.account().map(str::to_string),
                state.signing.draft_message.clone(),
                state.epoch,
            )
        };
        let Some(client) = client else {
            return Outcome::Skipped;
        };
        let Some(account) = account else {
            return self.record_failure("sign_message", WalletError::NoAccount);
        };

        match client.personal_sign(&message, &account).await {
            Ok(signature) => {
                let mut state = self.lock();
                if state.epoch != epoch {
                    tracing::debug!("Session reset while signing, dropping signature");
                    return Outcome::Skipped;
                }
                state.signing.signed_message = message;
                state.signing.signature = Some(signature);
                // A new signature has not been verified yet.
                state.signing.verified = None;
                Outcome::Completed
            }
            Err(e) => self.record_failure("sign_message", e),
        }
    }

    /// Recover the signer of the last signature and compare it to the account.
    pub async fn verify_message(&self) -> Outcome {
        let (client, account, signed_message, signature, epoch) = {
            let state = self.lock();
            (
                state.session.client().cloned(),
                state.session.account().map(str::to_string),
                state.signing.signed_message.clone(),
                state.signing.signature.clone(),
                state.epoch,
            )
        };
        let Some(client) = client else {
            return Outcome::Skipped;
        };
        let Some(signature) = signature else {
            tracing::debug!("Nothing signed since the last reset, skipping verification");
            return Outcome::Skipped;
        };

        match client.ec_recover(&signed_message, &signature).await {
            Ok(recovered) => {
                let verified = account
                    .as_deref()
                    .is_some_and(|account| account.eq_ignore_ascii_case(&recovered));
                let mut state = self.lock();
                if state.epoch != epoch || state.signing.signature.as_ref() != Some(&signature) {
                    tracing::debug!("Signature changed while verifying, dropping result");
                    return Outcome::Skipped;
                }
                state.signing.verified = Some(verified);
                tracing::info!(verified, "Message verification finished");
                Outcome::Completed
            }
            Err(e) => self.record_failure("verify_message", e),
        }
    }

    /// Derived state for display.
    pub fn view(&self) -> SessionView {
        view::build(&self.lock())
    }

    pub fn is_connected(&self) -> bool {
        self.lock().session.is_connected()
    }

    /// Copy of the signing state.
    pub fn signing(&self) -> SigningState {
        self.lock().signing.clone()
    }

    /// Most recent recorded failure.
    pub fn last_error(&self) -> Option<WalletError> {
        self.lock().last_error.clone()
    }

    /// Stop listening to provider events. Call on application shutdown.
    pub fn shutdown(&self) {
        if let Some(subscription) = self.lock().subscription.take() {
            subscription.cancel();
            tracing::info!(subscription = %subscription.id(), "Wallet event subscription closed");
        }
    }

    /// Apply a provider push event.
    pub(crate) async fn handle_event(&self, event: ProviderEvent) {
        match event {
            ProviderEvent::AccountsChanged(accounts) => {
                let account = match accounts.first().map(|a| normalize_address(a)).transpose() {
                    Ok(account) => account,
                    Err(e) => {
                        self.record_failure("accounts_changed", e);
                        return;
                    }
                };
                tracing::info!(account = account.as_deref().unwrap_or("none"), "accountsChanged");
                if let Some(connection) = self.lock().session.connection.as_mut() {
                    connection.account = account;
                }
            }
            ProviderEvent::ChainChanged(raw) => {
                let Some(chain_id) = parse_chain_id(&raw) else {
                    self.record_failure(
                        "chain_changed",
                        WalletError::InvalidResponse(format!("chainChanged with {raw}")),
                    );
                    return;
                };
                tracing::info!(chain_id, "chainChanged");
                if let Some(connection) = self.lock().session.connection.as_mut() {
                    connection.chain_id = Some(chain_id);
                }
            }
            ProviderEvent::Disconnect { code, message } => {
                tracing::info!(code, message = %message, "Provider disconnected");
                self.disconnect().await;
            }
        }
    }

    fn record_failure(&self, operation: &'static str, error: WalletError) -> Outcome {
        tracing::warn!(operation, error = %error, "Wallet operation failed");
        self.lock().last_error = Some(error);
        Outcome::Failed
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn downgrade(&self) -> WeakSession {
        WeakSession(Arc::downgrade(&self.inner))
    }
}
