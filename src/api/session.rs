// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Query, State},
    Json,
};

use super::operation;
use crate::{
    models::{ConnectQuery, OperationResponse, SessionView},
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/v1/session",
    tag = "Session",
    responses((status = 200, body = SessionView))
)]
pub async fn get_session(State(state): State<AppState>) -> Json<SessionView> {
    Json(state.session.view())
}

/// Connect a wallet, optionally forcing a provider option.
#[utoipa::path(
    post,
    path = "/v1/session/connect",
    params(ConnectQuery),
    tag = "Session",
    responses((status = 200, body = OperationResponse))
)]
pub async fn connect(
    State(state): State<AppState>,
    Query(query): Query<ConnectQuery>,
) -> Json<OperationResponse> {
    let outcome = match query.provider.as_deref() {
        Some(provider) => state.session.connect_with(provider).await,
        None => state.session.connect().await,
    };
    operation(&state, outcome)
}

#[utoipa::path(
    post,
    path = "/v1/session/disconnect",
    tag = "Session",
    responses((status = 200, body = OperationResponse))
)]
pub async fn disconnect(State(state): State<AppState>) -> Json<OperationResponse> {
    let outcome = state.session.disconnect().await;
    operation(&state, outcome)
}
