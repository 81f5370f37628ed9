//! REST API for the FAQ chatbot.
//!
//! # Endpoints
//!
//! - `GET /` - Health check
//! - `POST /ask` - Answer a question, remember the turn and log it
//! - `GET /logs` - All conversation logs, oldest first
//! - `POST /train` - Add a training Q&A pair
//! - `GET /training` - All training pairs, oldest first
//! - `POST /reset` - Clear conversation memory (all sessions, or `?session_id=`)
//! - `GET /status` - Row counts and memory size
//!
//! Errors are returned as `{"detail": "..."}`.

pub mod models;
pub mod routes;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use state::AppState;

/// Create the API router with all routes configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::health))
        .route("/ask", post(routes::ask))
        .route("/logs", get(routes::list_logs))
        .route("/train", post(routes::add_training))
        .route("/training", get(routes::list_training))
        .route("/reset", post(routes::reset_memory))
        .route("/status", get(routes::status))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until Ctrl+C.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> anyhow::Result<()> {
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Starting FAQ chatbot API server");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
