// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::session::WalletSession;

#[derive(Clone)]
pub struct AppState {
    pub session: WalletSession,
    /// Provider options offered by the selector, sorted.
    pub provider_options: Arc<Vec<String>>,
}

impl AppState {
    pub fn new(session: WalletSession, provider_options: Vec<String>) -> Self {
        Self {
            session,
            provider_options: Arc::new(provider_options),
        }
    }
}
