// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use tokio::net::TcpListener;

use wallet_session::api::router;
use wallet_session::config::AppConfig;
use wallet_session::provider::ProviderSelector;
use wallet_session::session::{Outcome, WalletSession};
use wallet_session::state::AppState;
use wallet_session::telemetry::init_tracing;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    init_tracing(config.log_format);

    let selector = ProviderSelector::from_config(&config)?;
    let options = selector.options();
    tracing::info!(providers = ?options, "Wallet providers registered");

    let session = WalletSession::new(Arc::new(selector));
    if session.restore().await == Outcome::Failed {
        tracing::warn!(error = ?session.last_error(), "Could not restore cached wallet session");
    }

    let app = router(AppState::new(session.clone(), options));
    let addr = config.bind_address()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Wallet session gateway listening (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    session.shutdown();
    tracing::info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
