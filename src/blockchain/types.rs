// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Network descriptors, chain-id encoding and address normalisation.

use std::str::FromStr;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::provider::WalletError;

/// Native currency of a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeCurrency {
    pub name: &'static str,
    pub symbol: &'static str,
    pub decimals: u8,
}

/// Parameters needed to ask a wallet to add a network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkDescriptor {
    /// Chain ID
    pub chain_id: u64,
    /// Network name for display
    pub name: &'static str,
    /// RPC endpoint URLs
    pub rpc_urls: &'static [&'static str],
    /// Native currency
    pub native_currency: NativeCurrency,
    /// Block explorer URLs
    pub block_explorer_urls: &'static [&'static str],
    /// Icon URLs
    pub icon_urls: &'static [&'static str],
}

impl NetworkDescriptor {
    /// Chain id as sent to the wallet.
    pub fn chain_id_hex(&self) -> String {
        to_hex(self.chain_id)
    }
}

const ETHER: NativeCurrency = NativeCurrency {
    name: "Ether",
    symbol: "ETH",
    decimals: 18,
};

/// Ethereum Mainnet configuration.
pub const ETH_MAINNET: NetworkDescriptor = NetworkDescriptor {
    chain_id: 1,
    name: "Ethereum Mainnet",
    rpc_urls: &["https://cloudflare-eth.com"],
    native_currency: ETHER,
    block_explorer_urls: &["https://etherscan.io"],
    icon_urls: &[],
};

/// Ropsten testnet configuration.
pub const ETH_ROPSTEN: NetworkDescriptor = NetworkDescriptor {
    chain_id: 3,
    name: "Ropsten Test Network",
    rpc_urls: &["https://ropsten.infura.io/v3/"],
    native_currency: NativeCurrency {
        name: "Ropsten Ether",
        symbol: "ETH",
        decimals: 18,
    },
    block_explorer_urls: &["https://ropsten.etherscan.io"],
    icon_urls: &[],
};

/// Rinkeby testnet configuration.
pub const ETH_RINKEBY: NetworkDescriptor = NetworkDescriptor {
    chain_id: 4,
    name: "Rinkeby Test Network",
    rpc_urls: &["https://rinkeby.infura.io/v3/"],
    native_currency: NativeCurrency {
        name: "Rinkeby Ether",
        symbol: "ETH",
        decimals: 18,
    },
    block_explorer_urls: &["https://rinkeby.etherscan.io"],
    icon_urls: &[],
};

/// Kovan testnet configuration.
pub const ETH_KOVAN: NetworkDescriptor = NetworkDescriptor {
    chain_id: 42,
    name: "Kovan Test Network",
    rpc_urls: &["https://kovan.infura.io/v3/"],
    native_currency: NativeCurrency {
        name: "Kovan Ether",
        symbol: "ETH",
        decimals: 18,
    },
    block_explorer_urls: &["https://kovan.etherscan.io"],
    icon_urls: &[],
};

/// Harmony Mainnet Shard 0 configuration.
pub const HARMONY_MAINNET: NetworkDescriptor = NetworkDescriptor {
    chain_id: 1_666_600_000,
    name: "Harmony Mainnet",
    rpc_urls: &["https://api.harmony.one"],
    native_currency: NativeCurrency {
        name: "ONE",
        symbol: "ONE",
        decimals: 18,
    },
    block_explorer_urls: &["https://explorer.harmony.one"],
    icon_urls: &["https://harmonynews.one/wp-content/uploads/2019/11/slfdjs.png"],
};

/// Celo Mainnet configuration.
pub const CELO_MAINNET: NetworkDescriptor = NetworkDescriptor {
    chain_id: 42_220,
    name: "Celo Mainnet",
    rpc_urls: &["https://forno.celo.org"],
    native_currency: NativeCurrency {
        name: "CELO",
        symbol: "CELO",
        decimals: 18,
    },
    block_explorer_urls: &["https://explorer.celo.org"],
    icon_urls: &["https://celo.org/images/celo-logo.png"],
};

/// Every network the gateway can ask a wallet to add.
pub const NETWORKS: &[NetworkDescriptor] = &[
    ETH_MAINNET,
    ETH_ROPSTEN,
    ETH_RINKEBY,
    ETH_KOVAN,
    HARMONY_MAINNET,
    CELO_MAINNET,
];

/// Networks offered to the user for switching, with their labels.
pub const SELECTABLE_NETWORKS: &[(u64, &str)] = &[(1, "Mainnet"), (4, "Rinkeby")];

/// Encode a chain id the way wallets expect it: `0x` + lowercase hex, no padding.
pub fn to_hex(value: u64) -> String {
    format!("0x{value:x}")
}

/// Look up network parameters by hex chain id.
pub fn network_params(chain_id_hex: &str) -> Option<&'static NetworkDescriptor> {
    let id = parse_chain_id_str(chain_id_hex)?;
    NETWORKS.iter().find(|network| network.chain_id == id)
}

/// Parse a chain id pushed by a provider: a number, a `0x` hex string or a
/// decimal string.
pub fn parse_chain_id(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number.as_u64(),
        Value::String(raw) => parse_chain_id_str(raw),
        _ => None,
    }
}

/// Parse a chain id typed as text: `0x` hex or decimal.
pub fn parse_chain_id_str(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => raw.parse().ok(),
    }
}

/// Validate an address and return it as lowercase `0x` hex.
pub fn normalize_address(raw: &str) -> Result<String, WalletError> {
    let address = Address::from_str(raw.trim())
        .map_err(|e| WalletError::InvalidResponse(format!("Invalid address {raw}: {e}")))?;
    Ok(alloy::hex::encode_prefixed(address.as_slice()))
}

/// `wallet_addEthereumChain` parameter object (EIP-3085).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddEthereumChainParameter {
    /// Hex chain id
    pub chain_id: String,
    pub chain_name: String,
    pub rpc_urls: Vec<String>,
    pub native_currency: NativeCurrencyParameter,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub block_explorer_urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub icon_urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NativeCurrencyParameter {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl From<&NetworkDescriptor> for AddEthereumChainParameter {
    fn from(network: &NetworkDescriptor) -> Self {
        let owned = |urls: &[&str]| urls.iter().map(|url| url.to_string()).collect();
        Self {
            chain_id: network.chain_id_hex(),
            chain_name: network.name.to_string(),
            rpc_urls: owned(network.rpc_urls),
            native_currency: NativeCurrencyParameter {
                name: network.native_currency.name.to_string(),
                symbol: network.native_currency.symbol.to_string(),
                decimals: network.native_currency.decimals,
            },
            block_explorer_urls: owned(network.block_explorer_urls),
            icon_urls: owned(network.icon_urls),
        }
    }
}
