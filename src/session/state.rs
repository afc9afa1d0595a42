// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session records held by the controller.

use chrono::{DateTime, Utc};

use super::subscription::EventSubscription;
use crate::blockchain::ChainClient;
use crate::provider::WalletError;

/// A live connection. The chain client owns the provider handle, so a
/// client exists exactly when a handle does, and an account only with both.
#[derive(Debug, Clone)]
pub struct Connection {
    pub client: ChainClient,
    /// Selector option the handle came from
    pub provider_id: String,
    /// Active account, lowercase
    pub account: Option<String>,
    pub chain_id: Option<u64>,
    pub connected_at: DateTime<Utc>,
}

/// Connection state plus the locally selected target network.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub connection: Option<Connection>,
    pub pending_network: Option<u64>,
}

impl Session {
    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    pub fn client(&self) -> Option<&ChainClient> {
        self.connection.as_ref().map(|c| &c.client)
    }

    pub fn account(&self) -> Option<&str> {
        self.connection.as_ref()?.account.as_deref()
    }

    pub fn chain_id(&self) -> Option<u64> {
        self.connection.as_ref()?.chain_id
    }
}

/// Message signing progress.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SigningState {
    pub draft_message: String,
    /// The message the current signature covers
    pub signed_message: String,
    pub signature: Option<String>,
    /// Only meaningful while `signature` is set.
    pub verified: Option<bool>,
}

/// Everything guarded by the controller's lock.
#[derive(Debug, Default)]
pub(crate) struct SessionState {
    pub session: Session,
    pub signing: SigningState,
    /// Last recorded failure, overwritten by the next one.
    pub last_error: Option<WalletError>,
    pub subscription: Option<EventSubscription>,
    /// Bumped on every reset so in-flight results from before it are dropped.
    pub epoch: u64,
}

impl SessionState {
    /// Empty Session and SigningState, and stop listening to the old handle.
    pub fn reset(&mut self) {
        self.session = Session::default();
        self.signing = SigningState::default();
        if let Some(subscription) = self.subscription.take() {
            subscription.cancel();
        }
        self.epoch += 1;
    }
}
