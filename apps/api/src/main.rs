mod auth;
mod certificate;
mod config;
mod errors;
mod events;
mod payments;
mod queries;
mod registration;
mod results;
mod routes;
mod state;
mod storage;
mod submissions;
mod upload;
mod users;
mod validation;

use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;
use crate::upload::MAX_UPLOAD_BYTES;

/// Request bodies may carry one full-size upload plus form fields.
const BODY_LIMIT_BYTES: usize = MAX_UPLOAD_BYTES as usize + 5 * 1024 * 1024;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Kalakriti API v{}", env!("CARGO_PKG_VERSION"));

    let backend = storage::connect(&config).await?;
    let state = AppState::new(backend, config.clone());
    info!(
        "Payment gateway: {} ({}ms simulated checkout)",
        state.payments.name(),
        config.payment_simulated_delay_ms
    );

    let app = build_router(state)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
