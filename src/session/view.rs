// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Derived view state.

use super::state::SessionState;
use crate::blockchain::{to_hex, ETH_MAINNET, SELECTABLE_NETWORKS};
use crate::models::{ErrorView, NetworkOption, SessionView};

/// Shown instead of an account while disconnected.
pub const CONNECT_PROMPT: &str = "Please connect your wallet";

/// Label for Ethereum mainnet.
pub const MAINNET_LABEL: &str = "ETH Mainnet";

const PREFIX_LEN: usize = 4; // "0x" + 2
const SUFFIX_LEN: usize = 2;

/// Shorten an address to `0xAB…YZ`.
///
/// Strings that are not `0x` followed by at least five alphanumerics are
/// returned unchanged, which makes the function idempotent.
pub fn truncate_address(address: &str) -> String {
    if address.is_empty() {
        return "No Account".to_string();
    }
    let Some(body) = address.strip_prefix("0x") else {
        return address.to_string();
    };
    if body.len() < PREFIX_LEN - 2 + SUFFIX_LEN + 1
        || !body.bytes().all(|b| b.is_ascii_alphanumeric())
    {
        return address.to_string();
    }
    format!(
        "{}…{}",
        &address[..PREFIX_LEN],
        &address[address.len() - SUFFIX_LEN..]
    )
}

/// Label shown next to the chain id.
pub fn network_label(chain_id: u64) -> String {
    if chain_id == ETH_MAINNET.chain_id {
        MAINNET_LABEL.to_string()
    } else {
        format!("{} please switch to mainnet", to_hex(chain_id))
    }
}

/// Entries of the network selector.
pub fn network_options() -> Vec<NetworkOption> {
    SELECTABLE_NETWORKS
        .iter()
        .map(|(chain_id, label)| NetworkOption {
            chain_id: *chain_id,
            chain_id_hex: to_hex(*chain_id),
            label: label.to_string(),
        })
        .collect()
}

pub(crate) fn build(state: &SessionState) -> SessionView {
    let connection = state.session.connection.as_ref();
    let account = state.session.account().map(str::to_string);
    let chain_id = state.session.chain_id();

    SessionView {
        connected: connection.is_some(),
        provider: connection.map(|c| c.provider_id.clone()),
        account_display: account
            .as_deref()
            .map(truncate_address)
            .unwrap_or_else(|| CONNECT_PROMPT.to_string()),
        account,
        chain_id,
        chain_id_hex: chain_id.map(to_hex),
        network_label: chain_id.map(network_label),
        pending_network: state.session.pending_network,
        network_options: network_options(),
        draft_message: state.signing.draft_message.clone(),
        signed_message: state.signing.signed_message.clone(),
        signature: state.signing.signature.clone(),
        verified: state.signing.verified,
        last_error: state.last_error.as_ref().map(ErrorView::from),
        connected_at: connection.map(|c| c.connected_at),
    }
}
