// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Scripted collaborators for unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::broadcast;

use super::error::UNSUPPORTED_METHOD;
use super::{ProviderEvent, ProviderHandle, WalletError, WalletProvider, WalletSelector};

type Scripted = Result<Value, WalletError>;

/// Provider answering from per-method scripts and recording every call.
pub(crate) struct ScriptedProvider {
    id: String,
    once: Mutex<HashMap<String, VecDeque<Scripted>>>,
    always: Mutex<HashMap<String, Scripted>>,
    calls: Mutex<Vec<(String, Value)>>,
    events: broadcast::Sender<ProviderEvent>,
}

impl ScriptedProvider {
    pub(crate) fn new(id: &str) -> Arc<Self> {
        let (events, _) = broadcast::channel(16);
        Arc::new(Self {
            id: id.to_string(),
            once: Mutex::new(HashMap::new()),
            always: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            events,
        })
    }

    /// Provider that already answers the connect-time queries.
    pub(crate) fn ethereum(id: &str, accounts: &[&str], chain_id: u64) -> Arc<Self> {
        let provider = Self::new(id);
        provider.respond("eth_accounts", Ok(json!(accounts)));
        provider.respond("eth_chainId", Ok(json!(format!("0x{chain_id:x}"))));
        provider
    }

    /// Answer every call to `method` with `result`.
    pub(crate) fn respond(&self, method: &str, result: Scripted) {
        self.always
            .lock()
            .unwrap()
            .insert(method.to_string(), result);
    }

    /// Answer the next call to `method` with `result`, before any `respond` script.
    pub(crate) fn respond_once(&self, method: &str, result: Scripted) {
        self.once
            .lock()
            .unwrap()
            .entry(method.to_string())
            .or_default()
            .push_back(result);
    }

    pub(crate) fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }

    /// Params of every call to `method`, in order.
    pub(crate) fn calls_to(&self, method: &str) -> Vec<Value> {
        self.calls()
            .into_iter()
            .filter(|(called, _)| called == method)
            .map(|(_, params)| params)
            .collect()
    }

    pub(crate) fn emit(&self, event: ProviderEvent) {
        let _ = self.events.send(event);
    }

    pub(crate) fn subscriber_count(&self) -> usize {
        self.events.receiver_count()
    }
}

#[async_trait]
impl WalletProvider for ScriptedProvider {
    fn id(&self) -> &str {
        &self.id
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value, WalletError> {
        self.calls
            .lock()
            .unwrap()
            .push((method.to_string(), params));

        if let Some(result) = self
            .once
            .lock()
            .unwrap()
            .get_mut(method)
            .and_then(VecDeque::pop_front)
        {
            return result;
        }
        self.always
            .lock()
            .unwrap()
            .get(method)
            .cloned()
            .unwrap_or_else(|| Err(WalletError::rpc(UNSUPPORTED_METHOD, format!("unscripted {method}"))))
    }

    fn subscribe(&self) -> broadcast::Receiver<ProviderEvent> {
        self.events.subscribe()
    }
}

/// Selector handing out one configurable provider.
#[derive(Default)]
pub(crate) struct StaticSelector {
    provider: Mutex<Option<ProviderHandle>>,
    cached: Mutex<Option<String>>,
    fail_clear: AtomicBool,
    connects: AtomicUsize,
    clears: AtomicUsize,
}

impl StaticSelector {
    pub(crate) fn with_provider(provider: ProviderHandle) -> Arc<Self> {
        let selector = Arc::new(Self::default());
        selector.set_provider(Some(provider));
        selector
    }

    /// `None` makes the next connect fail as if the user cancelled.
    pub(crate) fn set_provider(&self, provider: Option<ProviderHandle>) {
        *self.provider.lock().unwrap() = provider;
    }

    pub(crate) fn set_cached(&self, cached: Option<&str>) {
        *self.cached.lock().unwrap() = cached.map(str::to_string);
    }

    pub(crate) fn fail_clear(&self, fail: bool) {
        self.fail_clear.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub(crate) fn clears(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WalletSelector for StaticSelector {
    async fn connect(&self, _choice: Option<&str>) -> Result<ProviderHandle, WalletError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        let provider = self
            .provider
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| WalletError::Selection("Modal closed by user".to_string()))?;
        *self.cached.lock().unwrap() = Some(provider.id().to_string());
        Ok(provider)
    }

    async fn clear_cached_preference(&self) -> Result<(), WalletError> {
        self.clears.fetch_add(1, Ordering::SeqCst);
        if self.fail_clear.load(Ordering::SeqCst) {
            return Err(WalletError::Preference("storage unavailable".to_string()));
        }
        *self.cached.lock().unwrap() = None;
        Ok(())
    }

    fn cached_preference(&self) -> Option<String> {
        self.cached.lock().unwrap().clone()
    }
}

/// Wait until `check` holds, giving spawned tasks time to run.
pub(crate) async fn eventually(mut check: impl FnMut() -> bool) {
    for _ in 0..400 {
        if check() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached within 2s");
}
