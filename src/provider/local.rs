// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-process wallet backed by a local secp256k1 key.
//!
//! Behaves like a browser extension wallet for the subset of methods the
//! session uses: it exposes one account, tracks a current chain out of a
//! set of known chains, and pushes `chainChanged` when that chain changes.
//!
//! The private key never leaves the alloy signer and is never logged.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use alloy::primitives::Signature;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;
use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::broadcast;

use super::error::{
    CHAIN_NOT_RECOGNIZED, INTERNAL_ERROR, INVALID_PARAMS, UNAUTHORIZED, UNSUPPORTED_METHOD,
};
use super::{ProviderEvent, WalletError, WalletProvider, EVENT_CHANNEL_CAPACITY};
use crate::blockchain::{parse_chain_id, to_hex, AddEthereumChainParameter, ETH_MAINNET};

struct ChainState {
    current: u64,
    /// Known chains and their display names.
    known: BTreeMap<u64, String>,
}

/// Local signing wallet.
pub struct LocalWalletProvider {
    id: String,
    signer: PrivateKeySigner,
    /// Lowercase `0x` address of the signer
    address: String,
    chains: Mutex<ChainState>,
    events: broadcast::Sender<ProviderEvent>,
}

impl LocalWalletProvider {
    /// Default selector option id.
    pub const ID: &'static str = "local";

    /// Wallet pointed at `chain_id`. Mainnet is always known.
    pub fn new(signer: PrivateKeySigner, chain_id: u64) -> Self {
        let mut known = BTreeMap::new();
        known.insert(ETH_MAINNET.chain_id, ETH_MAINNET.name.to_string());
        known
            .entry(chain_id)
            .or_insert_with(|| format!("Chain {chain_id}"));

        let address = alloy::hex::encode_prefixed(signer.address().as_slice());
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            id: Self::ID.to_string(),
            signer,
            address,
            chains: Mutex::new(ChainState {
                current: chain_id,
                known,
            }),
            events,
        }
    }

    /// Wallet with a freshly generated key.
    pub fn random(chain_id: u64) -> Self {
        Self::new(PrivateKeySigner::random(), chain_id)
    }

    /// Register under a different selector option id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// The wallet's account, lowercase.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Chain the wallet currently points at.
    pub fn current_chain(&self) -> u64 {
        self.chains().current
    }

    pub fn knows_chain(&self, chain_id: u64) -> bool {
        self.chains().known.contains_key(&chain_id)
    }

    /// Number of live event subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.events.receiver_count()
    }

    /// Push an event to every subscriber.
    pub fn emit(&self, event: ProviderEvent) {
        // No subscribers is not an error for a wallet.
        let _ = self.events.send(event);
    }

    /// Simulate the wallet dropping the connection.
    pub fn disconnect(&self, code: i64, message: impl Into<String>) {
        self.emit(ProviderEvent::Disconnect {
            code,
            message: message.into(),
        });
    }

    fn chains(&self) -> MutexGuard<'_, ChainState> {
        self.chains.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn switch_chain(&self, params: &Value) -> Result<Value, WalletError> {
        let requested = param(params, 0)?
            .get("chainId")
            .and_then(parse_chain_id)
            .ok_or_else(|| WalletError::rpc(INVALID_PARAMS, "Expected { chainId: <hex> }"))?;

        let changed = {
            let mut chains = self.chains();
            if !chains.known.contains_key(&requested) {
                return Err(WalletError::rpc(
                    CHAIN_NOT_RECOGNIZED,
                    format!(
                        "Unrecognized chain ID \"{}\". Try adding the chain using wallet_addEthereumChain first.",
                        to_hex(requested)
                    ),
                ));
            }
            let changed = chains.current != requested;
            chains.current = requested;
            changed
        };

        if changed {
            tracing::debug!(chain_id = requested, "Local wallet switched chain");
            self.emit(ProviderEvent::ChainChanged(Value::String(to_hex(requested))));
        }
        Ok(Value::Null)
    }

    fn add_chain(&self, params: &Value) -> Result<Value, WalletError> {
        let parameter: AddEthereumChainParameter = serde_json::from_value(param(params, 0)?.clone())
            .map_err(|e| WalletError::rpc(INVALID_PARAMS, e.to_string()))?;
        let chain_id = parse_chain_id(&Value::String(parameter.chain_id.clone()))
            .ok_or_else(|| WalletError::rpc(INVALID_PARAMS, "Invalid chainId"))?;

        self.chains().known.insert(chain_id, parameter.chain_name);
        tracing::debug!(chain_id, "Local wallet added chain");
        Ok(Value::Null)
    }

    fn personal_sign(&self, params: &Value) -> Result<Value, WalletError> {
        let message = str_param(params, 0)?;
        let account = str_param(params, 1)?;
        if !account.eq_ignore_ascii_case(&self.address) {
            return Err(WalletError::rpc(
                UNAUTHORIZED,
                format!("Account {account} is not managed by this wallet"),
            ));
        }

        let signature = self
            .signer
            .sign_message_sync(&message_bytes(message))
            .map_err(|e| WalletError::rpc(INTERNAL_ERROR, e.to_string()))?;
        Ok(Value::String(alloy::hex::encode_prefixed(signature.as_bytes())))
    }

    fn ec_recover(&self, params: &Value) -> Result<Value, WalletError> {
        let message = str_param(params, 0)?;
        let signature_hex = str_param(params, 1)?;

        let raw = alloy::hex::decode(signature_hex)
            .map_err(|e| WalletError::rpc(INVALID_PARAMS, format!("Invalid signature: {e}")))?;
        let signature = Signature::from_raw(&raw)
            .map_err(|e| WalletError::rpc(INVALID_PARAMS, format!("Invalid signature: {e}")))?;
        let recovered = signature
            .recover_address_from_msg(message_bytes(message))
            .map_err(|e| WalletError::rpc(INVALID_PARAMS, format!("Recovery failed: {e}")))?;

        Ok(Value::String(alloy::hex::encode_prefixed(recovered.as_slice())))
    }
}

#[async_trait]
impl WalletProvider for LocalWalletProvider {
    fn id(&self) -> &str {
        &self.id
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value, WalletError> {
        match method {
            "eth_accounts" | "eth_requestAccounts" => Ok(json!([self.address])),
            "eth_chainId" => Ok(Value::String(to_hex(self.current_chain()))),
            "net_version" => Ok(Value::String(self.current_chain().to_string())),
            "wallet_switchEthereumChain" => self.switch_chain(&params),
            "wallet_addEthereumChain" => self.add_chain(&params),
            "personal_sign" => self.personal_sign(&params),
            "personal_ecRecover" => self.ec_recover(&params),
            other => Err(WalletError::rpc(
                UNSUPPORTED_METHOD,
                format!("Method {other} is not supported"),
            )),
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<ProviderEvent> {
        self.events.subscribe()
    }
}

// Implement Debug manually to avoid exposing the signer
impl fmt::Debug for LocalWalletProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalWalletProvider")
            .field("id", &self.id)
            .field("address", &self.address)
            .field("signer", &"[REDACTED]")
            .finish()
    }
}

fn param(params: &Value, index: usize) -> Result<&Value, WalletError> {
    params
        .get(index)
        .ok_or_else(|| WalletError::rpc(INVALID_PARAMS, format!("Missing parameter {index}")))
}

fn str_param(params: &Value, index: usize) -> Result<&str, WalletError> {
    param(params, index)?
        .as_str()
        .ok_or_else(|| WalletError::rpc(INVALID_PARAMS, format!("Parameter {index} must be a string")))
}

/// Hex messages are signed as raw bytes, anything else as UTF-8.
fn message_bytes(message: &str) -> Vec<u8> {
    match message.strip_prefix("0x") {
        Some(hex) if !hex.is_empty() => {
            alloy::hex::decode(hex).unwrap_or_else(|_| message.as_bytes().to_vec())
        }
        _ => message.as_bytes().to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::signing::signer_from_hex;
    use crate::blockchain::ETH_RINKEBY;

    const TEST_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const TEST_ADDRESS: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";
    const CHECKSUMMED_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    fn wallet(chain_id: u64) -> LocalWalletProvider {
        LocalWalletProvider::new(signer_from_hex(TEST_KEY).unwrap(), chain_id)
    }

    #[tokio::test]
    async fn exposes_single_account_and_chain() {
        let wallet = wallet(1);
        assert_eq!(
            wallet.request("eth_accounts", json!([])).await.unwrap(),
            json!([TEST_ADDRESS])
        );
        assert_eq!(
            wallet.request("eth_chainId", json!([])).await.unwrap(),
            json!("0x1")
        );
        assert_eq!(
            wallet.request("net_version", json!([])).await.unwrap(),
            json!("1")
        );
    }

    #[tokio::test]
    async fn sign_then_recover_yields_signer() {
        let wallet = wallet(1);
        let signature = wallet
            .request("personal_sign", json!(["hello", CHECKSUMMED_ADDRESS]))
            .await
            .unwrap();
        let signature = signature.as_str().unwrap().to_string();
        assert_eq!(signature.len(), 2 + 65 * 2);

        let recovered = wallet
            .request("personal_ecRecover", json!(["hello", signature]))
            .await
            .unwrap();
        assert_eq!(recovered, json!(TEST_ADDRESS));

        let other = wallet
            .request("personal_ecRecover", json!(["goodbye", signature]))
            .await
            .unwrap();
        assert_ne!(other, json!(TEST_ADDRESS));
    }

    #[tokio::test]
    async fn signing_for_foreign_account_is_unauthorized() {
        let wallet = wallet(1);
        let err = wallet
            .request(
                "personal_sign",
                json!(["hello", "0x0000000000000000000000000000000000000001"]),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some(UNAUTHORIZED));
    }

    #[tokio::test]
    async fn unknown_chain_must_be_added_before_switching() {
        let wallet = wallet(1);
        let mut events = wallet.subscribe();

        let err = wallet
            .request("wallet_switchEthereumChain", json!([{ "chainId": "0x4" }]))
            .await
            .unwrap_err();
        assert!(err.is_chain_not_recognized());
        assert_eq!(wallet.current_chain(), 1);

        let params = serde_json::to_value([AddEthereumChainParameter::from(&ETH_RINKEBY)]).unwrap();
        wallet
            .request("wallet_addEthereumChain", params)
            .await
            .unwrap();
        assert!(wallet.knows_chain(4));
        // Adding does not switch.
        assert_eq!(wallet.current_chain(), 1);

        wallet
            .request("wallet_switchEthereumChain", json!([{ "chainId": "0x4" }]))
            .await
            .unwrap();
        assert_eq!(wallet.current_chain(), 4);
        assert_eq!(
            events.recv().await.unwrap(),
            ProviderEvent::ChainChanged(json!("0x4"))
        );
    }

    #[tokio::test]
    async fn malformed_params_and_methods_are_rejected() {
        let wallet = wallet(1);
        let err = wallet
            .request("wallet_switchEthereumChain", json!([]))
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some(INVALID_PARAMS));

        let err = wallet
            .request("personal_ecRecover", json!(["hello", "0x1234"]))
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some(INVALID_PARAMS));

        let err = wallet
            .request("eth_sendTransaction", json!([]))
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some(UNSUPPORTED_METHOD));
    }

    #[test]
    fn hex_messages_are_decoded() {
        assert_eq!(message_bytes("0x6869"), b"hi".to_vec());
        assert_eq!(message_bytes("hello"), b"hello".to_vec());
        assert_eq!(message_bytes("0xnothex"), b"0xnothex".to_vec());
        assert_eq!(message_bytes("0x"), b"0x".to_vec());
    }

    #[test]
    fn debug_redacts_signer() {
        let debug_str = format!("{:?}", wallet(1));
        assert!(!debug_str.contains("ac0974bec"));
        assert!(debug_str.contains("[REDACTED]"));
    }
}
