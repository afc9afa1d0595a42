// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Provider push-event subscription.
//!
//! One background task per connected handle forwards `accountsChanged`,
//! `chainChanged` and `disconnect` into the session. The task ends when the
//! subscription is cancelled, dropped, or the provider closes its channel.

use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::controller::WeakSession;
use crate::provider::ProviderHandle;

/// Handle to a running event-forwarding task.
#[derive(Debug)]
pub struct EventSubscription {
    id: Uuid,
    provider_id: String,
    cancel: CancellationToken,
}

impl EventSubscription {
    /// Subscribe to `provider` and forward its events to `session`.
    ///
    /// Must be called from within a tokio runtime.
    pub(crate) fn spawn(provider: &ProviderHandle, session: WeakSession) -> Self {
        let id = Uuid::new_v4();
        let provider_id = provider.id().to_string();
        let cancel = CancellationToken::new();
        let mut events = provider.subscribe();

        let token = cancel.clone();
        let task_provider = provider_id.clone();
        tokio::spawn(async move {
            tracing::debug!(subscription = %id, provider = %task_provider, "Provider event subscription started");
            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    received = events.recv() => match received {
                        Ok(event) => {
                            if token.is_cancelled() {
                                break;
                            }
                            let Some(session) = session.upgrade() else {
                                break;
                            };
                            session.handle_event(event).await;
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!(subscription = %id, skipped, "Provider events dropped");
                        }
                        Err(RecvError::Closed) => break,
                    },
                }
            }
            tracing::debug!(subscription = %id, provider = %task_provider, "Provider event subscription stopped");
        });

        Self {
            id,
            provider_id,
            cancel,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn provider_id(&self) -> &str {
        &self.provider_id
    }

    /// Stop forwarding. The task drops its receiver on its next poll.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
