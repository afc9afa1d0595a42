// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use super::operation;
use crate::{
    error::ApiError,
    models::{DraftMessageRequest, OperationResponse},
    session::Outcome,
    state::AppState,
};

#[utoipa::path(
    put,
    path = "/v1/message/draft",
    request_body = DraftMessageRequest,
    tag = "Message",
    responses(
        (status = 200, body = OperationResponse),
        (status = 400, description = "Malformed body")
    )
)]
pub async fn set_draft_message(
    State(state): State<AppState>,
    payload: Result<Json<DraftMessageRequest>, JsonRejection>,
) -> Result<Json<OperationResponse>, ApiError> {
    let Json(request) = payload?;
    state.session.set_draft_message(request.message);
    Ok(operation(&state, Outcome::Completed))
}

/// Sign the draft message with the connected account.
#[utoipa::path(
    post,
    path = "/v1/message/sign",
    tag = "Message",
    responses((status = 200, body = OperationResponse))
)]
pub async fn sign_message(State(state): State<AppState>) -> Json<OperationResponse> {
    let outcome = state.session.sign_message().await;
    operation(&state, outcome)
}

/// Check that the last signature recovers to the connected account.
#[utoipa::path(
    post,
    path = "/v1/message/verify",
    tag = "Message",
    responses((status = 200, body = OperationResponse))
)]
pub async fn verify_message(State(state): State<AppState>) -> Json<OperationResponse> {
    let outcome = state.session.verify_message().await;
    operation(&state, outcome)
}
