// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `WALLET_PROVIDER` | Default provider option (`local` or `rpc`) | sole option |
//! | `WALLET_PRIVATE_KEY` | Hex private key of the local wallet | random key |
//! | `WALLET_KEY_PEM` | Path to a PEM private key for the local wallet | unset |
//! | `WALLET_CHAIN_ID` | Chain the local wallet starts on | `1` |
//! | `WALLET_RPC_URL` | JSON-RPC endpoint; registers the `rpc` option | unset |
//! | `WALLET_CACHE_PATH` | File holding the cached provider choice | `.wallet-session/cached-provider.json` |
//! | `WALLET_CACHE_PROVIDER` | Remember the last provider choice | `true` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

use url::Url;

use crate::blockchain::parse_chain_id_str;
use crate::storage::StoragePaths;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const PROVIDER_ENV: &str = "WALLET_PROVIDER";
pub const PRIVATE_KEY_ENV: &str = "WALLET_PRIVATE_KEY";

/// Path to a SEC1 or PKCS#8 PEM file. Takes precedence over
/// `WALLET_PRIVATE_KEY` when both are set.
pub const KEY_PEM_ENV: &str = "WALLET_KEY_PEM";
pub const CHAIN_ID_ENV: &str = "WALLET_CHAIN_ID";
pub const RPC_URL_ENV: &str = "WALLET_RPC_URL";
pub const CACHE_PATH_ENV: &str = "WALLET_CACHE_PATH";
pub const CACHE_PROVIDER_ENV: &str = "WALLET_CACHE_PROVIDER";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_CHAIN_ID: u64 = 1;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },

    #[error("Invalid bind address {0}")]
    BindAddress(String),
}

impl ConfigError {
    fn invalid(name: &'static str, reason: impl fmt::Display) -> Self {
        Self::Invalid {
            name,
            reason: reason.to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

/// Where the local wallet key comes from.
#[derive(Clone, PartialEq, Eq)]
pub enum KeySource {
    Hex(String),
    PemFile(PathBuf),
    /// A fresh key on every start.
    Random,
}

impl fmt::Debug for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySource::Hex(_) => f.write_str("Hex([REDACTED])"),
            KeySource::PemFile(path) => f.debug_tuple("PemFile").field(path).finish(),
            KeySource::Random => f.write_str("Random"),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub default_provider: Option<String>,
    pub key: KeySource,
    pub chain_id: u64,
    pub rpc_url: Option<Url>,
    /// `None` disables the provider cache.
    pub cache_path: Option<PathBuf>,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using `lookup` to read variables. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let host = get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match get(PORT_ENV) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|e| ConfigError::invalid(PORT_ENV, e))?,
            None => DEFAULT_PORT,
        };

        let key = match (get(KEY_PEM_ENV), get(PRIVATE_KEY_ENV)) {
            (Some(path), _) => KeySource::PemFile(PathBuf::from(path)),
            (None, Some(hex)) => KeySource::Hex(hex.trim().to_string()),
            (None, None) => KeySource::Random,
        };

        let chain_id = match get(CHAIN_ID_ENV) {
            Some(raw) => parse_chain_id_str(&raw).ok_or_else(|| {
                ConfigError::invalid(CHAIN_ID_ENV, format!("'{raw}' is not a chain id"))
            })?,
            None => DEFAULT_CHAIN_ID,
        };

        let rpc_url = get(RPC_URL_ENV)
            .map(|raw| Url::parse(raw.trim()))
            .transpose()
            .map_err(|e| ConfigError::invalid(RPC_URL_ENV, e))?;

        let cache_enabled = match get(CACHE_PROVIDER_ENV) {
            Some(raw) => parse_bool(&raw)
                .ok_or_else(|| ConfigError::invalid(CACHE_PROVIDER_ENV, format!("'{raw}' is not a boolean")))?,
            None => true,
        };
        let cache_path = cache_enabled.then(|| {
            get(CACHE_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| StoragePaths::default().preference_file())
        });

        let log_format = match get(LOG_FORMAT_ENV).map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if v == "json" => LogFormat::Json,
            Some(v) if v == "pretty" => LogFormat::Pretty,
            Some(other) => {
                return Err(ConfigError::invalid(
                    LOG_FORMAT_ENV,
                    format!("'{other}', expected json or pretty"),
                ))
            }
            None => LogFormat::default(),
        };

        Ok(Self {
            host,
            port,
            default_provider: get(PROVIDER_ENV).map(|v| v.trim().to_string()),
            key,
            chain_id,
            rpc_url,
            cache_path,
            log_format,
        })
    }

    /// Socket address to bind the HTTP server to.
    pub fn bind_address(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse().map_err(|_| ConfigError::BindAddress(raw))
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = load(&[]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.key, KeySource::Random);
        assert_eq!(config.chain_id, 1);
        assert_eq!(config.rpc_url, None);
        assert_eq!(config.default_provider, None);
        assert_eq!(
            config.cache_path,
            Some(PathBuf::from(".wallet-session/cached-provider.json"))
        );
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.bind_address().unwrap().port(), 8080);
    }

    #[test]
    fn reads_every_variable() {
        let config = load(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "3000"),
            ("WALLET_PROVIDER", "rpc"),
            ("WALLET_PRIVATE_KEY", "0xabc"),
            ("WALLET_CHAIN_ID", "0x4"),
            ("WALLET_RPC_URL", "http://localhost:8545"),
            ("WALLET_CACHE_PATH", "/tmp/pref.json"),
            ("LOG_FORMAT", "JSON"),
        ])
        .unwrap();

        assert_eq!(config.bind_address().unwrap().to_string(), "127.0.0.1:3000");
        assert_eq!(config.default_provider.as_deref(), Some("rpc"));
        assert_eq!(config.key, KeySource::Hex("0xabc".to_string()));
        assert_eq!(config.chain_id, 4);
        assert_eq!(config.rpc_url.unwrap().as_str(), "http://localhost:8545/");
        assert_eq!(config.cache_path, Some(PathBuf::from("/tmp/pref.json")));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn pem_file_wins_over_hex_key() {
        let config = load(&[
            ("WALLET_PRIVATE_KEY", "0xabc"),
            ("WALLET_KEY_PEM", "/keys/wallet.pem"),
        ])
        .unwrap();
        assert_eq!(config.key, KeySource::PemFile(PathBuf::from("/keys/wallet.pem")));
    }

    #[test]
    fn cache_can_be_disabled() {
        let config = load(&[("WALLET_CACHE_PROVIDER", "false")]).unwrap();
        assert_eq!(config.cache_path, None);
    }

    #[test]
    fn empty_values_count_as_unset() {
        let config = load(&[("PORT", ""), ("WALLET_RPC_URL", "  ")]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rpc_url, None);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            load(&[("PORT", "http")]),
            Err(ConfigError::Invalid { name: "PORT", .. })
        ));
        assert!(matches!(
            load(&[("WALLET_CHAIN_ID", "mainnet")]),
            Err(ConfigError::Invalid { name: "WALLET_CHAIN_ID", .. })
        ));
        assert!(matches!(
            load(&[("WALLET_RPC_URL", "not a url")]),
            Err(ConfigError::Invalid { name: "WALLET_RPC_URL", .. })
        ));
        assert!(matches!(
            load(&[("WALLET_CACHE_PROVIDER", "maybe")]),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            load(&[("LOG_FORMAT", "xml")]),
            Err(ConfigError::Invalid { name: "LOG_FORMAT", .. })
        ));

        let config = load(&[("HOST", "not an ip")]).unwrap();
        assert!(matches!(config.bind_address(), Err(ConfigError::BindAddress(_))));
    }

    #[test]
    fn debug_redacts_private_key() {
        let config = load(&[("WALLET_PRIVATE_KEY", "0xdeadbeef")]).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("deadbeef"));
        assert!(debug.contains("REDACTED"));
    }
}
