// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Chain-RPC client wrapping a connected wallet provider.

use std::fmt;

use serde_json::{json, Value};

use super::types::*;
use crate::provider::{ProviderHandle, WalletError};

/// Typed JSON-RPC calls issued through a provider handle.
#[derive(Clone)]
pub struct ChainClient {
    provider: ProviderHandle,
}

impl ChainClient {
    /// Wrap a provider handle.
    pub fn new(provider: ProviderHandle) -> Self {
        Self { provider }
    }

    /// The wrapped provider.
    pub fn provider(&self) -> &ProviderHandle {
        &self.provider
    }

    /// Accounts exposed by the wallet, lowercased. The first one is active.
    pub async fn accounts(&self) -> Result<Vec<String>, WalletError> {
        let value = self.provider.request("eth_accounts", json!([])).await?;
        let raw = value.as_array().ok_or_else(|| {
            WalletError::InvalidResponse(format!("eth_accounts returned {value}"))
        })?;

        raw.iter()
            .map(|entry| {
                entry
                    .as_str()
                    .ok_or_else(|| {
                        WalletError::InvalidResponse(format!("Account is not a string: {entry}"))
                    })
                    .and_then(normalize_address)
            })
            .collect()
    }

    /// Chain id the wallet currently points at.
    pub async fn chain_id(&self) -> Result<u64, WalletError> {
        let value = self.provider.request("eth_chainId", json!([])).await?;
        parse_chain_id(&value)
            .ok_or_else(|| WalletError::InvalidResponse(format!("eth_chainId returned {value}")))
    }

    /// Ask the wallet to switch to `chain_id`.
    pub async fn switch_chain(&self, chain_id: u64) -> Result<(), WalletError> {
        self.provider
            .request(
                "wallet_switchEthereumChain",
                json!([{ "chainId": to_hex(chain_id) }]),
            )
            .await?;
        Ok(())
    }

    /// Ask the wallet to add a network definition.
    pub async fn add_chain(&self, network: &NetworkDescriptor) -> Result<(), WalletError> {
        let params = serde_json::to_value([AddEthereumChainParameter::from(network)])
            .map_err(|e| WalletError::InvalidResponse(e.to_string()))?;
        self.provider
            .request("wallet_addEthereumChain", params)
            .await?;
        Ok(())
    }

    /// Personal-message signature (EIP-191) by `account`.
    pub async fn personal_sign(&self, message: &str, account: &str) -> Result<String, WalletError> {
        let value = self
            .provider
            .request("personal_sign", json!([message, account]))
            .await?;
        expect_string("personal_sign", value)
    }

    /// Recover the signer address of a personal-message signature, lowercased.
    pub async fn ec_recover(&self, message: &str, signature: &str) -> Result<String, WalletError> {
        let value = self
            .provider
            .request("personal_ecRecover", json!([message, signature]))
            .await?;
        let recovered = expect_string("personal_ecRecover", value)?;
        normalize_address(&recovered)
    }
}

impl fmt::Debug for ChainClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainClient")
            .field("provider", &self.provider.id())
            .finish()
    }
}

fn expect_string(method: &str, value: Value) -> Result<String, WalletError> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(WalletError::InvalidResponse(format!(
            "{method} returned {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::error::CHAIN_NOT_RECOGNIZED;
    use crate::provider::testing::ScriptedProvider;

    #[tokio::test]
    async fn accounts_are_normalized() {
        let provider = ScriptedProvider::new("mock");
        provider.respond(
            "eth_accounts",
            Ok(json!([
                "0xAAAaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
                "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb"
            ])),
        );
        let client = ChainClient::new(provider.clone());

        let accounts = client.accounts().await.unwrap();
        assert_eq!(
            accounts,
            vec![
                "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa".to_string(),
                "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn malformed_responses_are_rejected() {
        let provider = ScriptedProvider::new("mock");
        provider.respond("eth_accounts", Ok(json!("0xabc")));
        provider.respond("eth_chainId", Ok(json!({ "id": 1 })));
        provider.respond("personal_sign", Ok(json!(42)));
        let client = ChainClient::new(provider.clone());

        assert!(matches!(
            client.accounts().await,
            Err(WalletError::InvalidResponse(_))
        ));
        assert!(matches!(
            client.chain_id().await,
            Err(WalletError::InvalidResponse(_))
        ));
        assert!(matches!(
            client.personal_sign("hello", "0xabc").await,
            Err(WalletError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn switch_and_add_send_wallet_params() {
        let provider = ScriptedProvider::new("mock");
        provider.respond(
            "wallet_switchEthereumChain",
            Err(WalletError::rpc(CHAIN_NOT_RECOGNIZED, "Unrecognized chain ID")),
        );
        provider.respond("wallet_addEthereumChain", Ok(Value::Null));
        let client = ChainClient::new(provider.clone());

        let err = client.switch_chain(4).await.unwrap_err();
        assert!(err.is_chain_not_recognized());
        client.add_chain(&ETH_RINKEBY).await.unwrap();

        assert_eq!(
            provider.calls_to("wallet_switchEthereumChain"),
            vec![json!([{ "chainId": "0x4" }])]
        );
        let added = provider.calls_to("wallet_addEthereumChain");
        assert_eq!(added.len(), 1);
        assert_eq!(added[0][0]["chainId"], "0x4");
        assert_eq!(added[0][0]["chainName"], "Rinkeby Test Network");
    }

    #[tokio::test]
    async fn personal_sign_passes_message_then_account() {
        let provider = ScriptedProvider::new("mock");
        provider.respond("personal_sign", Ok(json!("0xSIG")));
        let client = ChainClient::new(provider.clone());

        let signature = client.personal_sign("hello", "0xabc").await.unwrap();
        assert_eq!(signature, "0xSIG");
        assert_eq!(
            provider.calls_to("personal_sign"),
            vec![json!(["hello", "0xabc"])]
        );
    }
}
