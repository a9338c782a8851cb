//! Document Verification Server
//!
//! Accepts scanned certificates and transcripts, runs OCR over them, scores
//! the extracted text for signs of tampering and queues every result for a
//! human operator. Provides REST API endpoints for:
//!
//! - Document upload and verification
//! - Review queue listing
//! - Approve / reject decisions
//! - Service health

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod config;
mod error;
mod service;
mod state;
#[cfg(test)]
mod tests;

use api::{
    handle_approve, handle_get_case, handle_health, handle_list_queue, handle_reject,
    handle_verify_document,
};
use config::Config;
use state::AppState;

/// Build the full router over `state`
pub fn build_router(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/verify-document", post(handle_verify_document))
        .route("/verification/health", get(handle_health))
        .route("/verification/queue", get(handle_list_queue))
        .route("/verification/:case_id", get(handle_get_case))
        .route("/verification/:case_id/approve", post(handle_approve))
        .route("/verification/:case_id/reject", post(handle_reject))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::parse();

    // Initialize logging
    let log_level = if config.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::from_default_env()
                .add_directive(log_level.into())
                .add_directive("sqlx=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting verification server on {}:{}", config.host, config.port);

    let state = Arc::new(AppState::from_config(&config).await?);
    let health = state.service.health();
    info!("OCR engine: {} ({})", health.ocr_engine, health.status);

    let app = build_router(Arc::clone(&state), config.max_upload_bytes);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    info!("Extraction timeout: {}ms", config.extraction_timeout_ms);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.service.shutdown().await;
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
