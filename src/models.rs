// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response structures used by the REST API. All types derive
//! `Serialize` / `Deserialize` and `ToSchema` for JSON handling and OpenAPI
//! documentation.
//!
//! ## Model Categories
//!
//! - **Session view**: derived state shown to the user
//! - **Operations**: outcome of a controller operation plus the new view
//! - **Requests**: bodies and query strings accepted by the endpoints

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::provider::WalletError;
use crate::session::Outcome;

// =============================================================================
// Session View
// =============================================================================

/// Everything a wallet-connect page renders.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct SessionView {
    /// Whether a provider handle is held.
    pub connected: bool,
    /// Selector option of the connected provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Active account, lowercase hex.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    /// Truncated account, or a prompt to connect.
    pub account_display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id_hex: Option<String>,
    /// "ETH Mainnet", or a prompt to switch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_label: Option<String>,
    /// Network chosen for the next switch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_network: Option<u64>,
    /// Networks the user can pick from.
    pub network_options: Vec<NetworkOption>,
    pub draft_message: String,
    pub signed_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
    /// Most recent failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<ErrorView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connected_at: Option<DateTime<Utc>>,
}

/// One entry of the network selector.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct NetworkOption {
    pub chain_id: u64,
    pub chain_id_hex: String,
    pub label: String,
}

/// A recorded failure.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ErrorView {
    /// Stable machine-readable kind (e.g. `chain_not_recognized`).
    pub kind: String,
    /// Provider error code, when the provider reported one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    pub message: String,
}

impl From<&WalletError> for ErrorView {
    fn from(error: &WalletError) -> Self {
        Self {
            kind: error.kind().to_string(),
            code: error.code(),
            message: error.to_string(),
        }
    }
}

// =============================================================================
// Operations
// =============================================================================

/// Result of a controller operation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct OperationResponse {
    pub outcome: Outcome,
    pub session: SessionView,
}

// =============================================================================
// Requests
// =============================================================================

/// Query string of the connect endpoint.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ConnectQuery {
    /// Provider option to use instead of the cached/default one.
    pub provider: Option<String>,
}

/// A chain id as typed by a user: a number or a numeric string.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(untagged)]
pub enum ChainIdInput {
    Number(u64),
    Text(String),
}

/// Body of the pending-network endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SelectNetworkRequest {
    pub chain_id: ChainIdInput,
}

/// Body of the draft-message endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DraftMessageRequest {
    pub message: String,
}

/// A network the wallet can be asked to add.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct NetworkInfo {
    pub chain_id: u64,
    pub chain_id_hex: String,
    pub name: String,
    pub currency_symbol: String,
    pub rpc_urls: Vec<String>,
    pub block_explorer_urls: Vec<String>,
    /// Offered in the network selector.
    pub selectable: bool,
}
