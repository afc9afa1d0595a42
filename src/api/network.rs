// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use super::operation;
use crate::{
    blockchain::{parse_chain_id_str, NETWORKS, SELECTABLE_NETWORKS},
    error::ApiError,
    models::{ChainIdInput, NetworkInfo, OperationResponse, SelectNetworkRequest},
    session::Outcome,
    state::AppState,
};

fn chain_id_from_input(input: &ChainIdInput) -> Result<u64, ApiError> {
    match input {
        ChainIdInput::Number(chain_id) => Ok(*chain_id),
        ChainIdInput::Text(raw) => parse_chain_id_str(raw)
            .ok_or_else(|| ApiError::bad_request(format!("'{raw}' is not a chain id"))),
    }
}

/// Choose the network the next switch targets. Nothing is sent to the wallet.
#[utoipa::path(
    put,
    path = "/v1/network/pending",
    request_body = SelectNetworkRequest,
    tag = "Network",
    responses(
        (status = 200, body = OperationResponse),
        (status = 400, description = "Body is not a chain id")
    )
)]
pub async fn select_pending_network(
    State(state): State<AppState>,
    payload: Result<Json<SelectNetworkRequest>, JsonRejection>,
) -> Result<Json<OperationResponse>, ApiError> {
    let Json(request) = payload?;
    let chain_id = chain_id_from_input(&request.chain_id)?;
    state.session.select_pending_network(chain_id);
    Ok(operation(&state, Outcome::Completed))
}

/// Ask the wallet to switch to the pending network, adding it when unknown.
#[utoipa::path(
    post,
    path = "/v1/network/switch",
    tag = "Network",
    responses((status = 200, body = OperationResponse))
)]
pub async fn switch_network(State(state): State<AppState>) -> Json<OperationResponse> {
    let outcome = state.session.switch_network().await;
    operation(&state, outcome)
}

#[utoipa::path(
    get,
    path = "/v1/networks",
    tag = "Network",
    responses((status = 200, body = [NetworkInfo]))
)]
pub async fn list_networks() -> Json<Vec<NetworkInfo>> {
    let networks = NETWORKS
        .iter()
        .map(|network| NetworkInfo {
            chain_id: network.chain_id,
            chain_id_hex: network.chain_id_hex(),
            name: network.name.to_string(),
            currency_symbol: network.native_currency.symbol.to_string(),
            rpc_urls: network.rpc_urls.iter().map(|u| u.to_string()).collect(),
            block_explorer_urls: network
                .block_explorer_urls
                .iter()
                .map(|u| u.to_string())
                .collect(),
            selectable: SELECTABLE_NETWORKS
                .iter()
                .any(|(chain_id, _)| *chain_id == network.chain_id),
        })
        .collect();
    Json(networks)
}
