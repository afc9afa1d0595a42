// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet provider errors.
//!
//! Every failure the session controller can record originates here. Codes
//! follow EIP-1193 / EIP-3326 where the provider reports one.

/// The wallet does not know the requested chain (EIP-3326).
pub const CHAIN_NOT_RECOGNIZED: i64 = 4902;

/// The user rejected the request.
pub const USER_REJECTED: i64 = 4001;

/// The requested account or method has not been authorized.
pub const UNAUTHORIZED: i64 = 4100;

/// The provider does not support the requested method.
pub const UNSUPPORTED_METHOD: i64 = 4200;

/// JSON-RPC invalid method parameters.
pub const INVALID_PARAMS: i64 = -32602;

/// JSON-RPC internal error.
pub const INTERNAL_ERROR: i64 = -32603;

/// Errors that can occur while talking to a wallet provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WalletError {
    #[error("Provider selection failed: {0}")]
    Selection(String),

    #[error("Unknown provider option: {0}")]
    UnknownProvider(String),

    #[error("Provider error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    #[error("No network selected")]
    NoPendingNetwork,

    #[error("No network parameters known for chain {0}")]
    UnsupportedNetwork(String),

    #[error("No active account")]
    NoAccount,

    #[error("Cached preference error: {0}")]
    Preference(String),

    #[error("Invalid wallet key: {0}")]
    Key(String),
}

impl WalletError {
    /// Build a provider-reported error.
    pub fn rpc(code: i64, message: impl Into<String>) -> Self {
        WalletError::Rpc {
            code,
            message: message.into(),
        }
    }

    /// Provider error code, if the provider reported one.
    pub fn code(&self) -> Option<i64> {
        match self {
            WalletError::Rpc { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Whether this is the "add the chain first" answer to a switch request.
    pub fn is_chain_not_recognized(&self) -> bool {
        self.code() == Some(CHAIN_NOT_RECOGNIZED)
    }

    /// Stable machine-readable kind.
    pub fn kind(&self) -> &'static str {
        match self {
            WalletError::Selection(_) => "selection",
            WalletError::UnknownProvider(_) => "unknown_provider",
            WalletError::Rpc { code, .. } if *code == CHAIN_NOT_RECOGNIZED => {
                "chain_not_recognized"
            }
            WalletError::Rpc { code, .. } if *code == USER_REJECTED => "user_rejected",
            WalletError::Rpc { .. } => "rpc",
            WalletError::Transport(_) => "transport",
            WalletError::InvalidResponse(_) => "invalid_response",
            WalletError::NoPendingNetwork => "no_pending_network",
            WalletError::UnsupportedNetwork(_) => "unsupported_network",
            WalletError::NoAccount => "no_account",
            WalletError::Preference(_) => "preference",
            WalletError::Key(_) => "key",
        }
    }
}
