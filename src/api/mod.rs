// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    blockchain::{AddEthereumChainParameter, NativeCurrencyParameter},
    error::ApiError,
    models::{
        ChainIdInput, DraftMessageRequest, ErrorView, NetworkInfo, NetworkOption,
        OperationResponse, SelectNetworkRequest, SessionView,
    },
    session::Outcome,
    state::AppState,
};

pub mod health;
pub mod message;
pub mod network;
pub mod session;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/session", get(session::get_session))
        .route("/session/connect", post(session::connect))
        .route("/session/disconnect", post(session::disconnect))
        .route("/network/pending", put(network::select_pending_network))
        .route("/network/switch", post(network::switch_network))
        .route("/networks", get(network::list_networks))
        .route("/message/draft", put(message::set_draft_message))
        .route("/message/sign", post(message::sign_message))
        .route("/message/verify", post(message::verify_message))
        .with_state(state.clone());

    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    Router::new()
        .nest("/v1", v1_routes)
        .merge(health_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .fallback(|| async { ApiError::not_found("Route not found") })
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Wrap an operation outcome with the session it produced.
pub(crate) fn operation(state: &AppState, outcome: Outcome) -> Json<OperationResponse> {
    Json(OperationResponse {
        outcome,
        session: state.session.view(),
    })
}

#[derive(OpenApi)]
#[openapi(
    paths(
        session::get_session,
        session::connect,
        session::disconnect,
        network::select_pending_network,
        network::switch_network,
        network::list_networks,
        message::set_draft_message,
        message::sign_message,
        message::verify_message,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            SessionView,
            NetworkOption,
            ErrorView,
            Outcome,
            OperationResponse,
            ChainIdInput,
            SelectNetworkRequest,
            DraftMessageRequest,
            NetworkInfo,
            AddEthereumChainParameter,
            NativeCurrencyParameter,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Session", description = "Wallet connection lifecycle"),
        (name = "Network", description = "Network selection and switching"),
        (name = "Message", description = "Message signing and verification"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;
