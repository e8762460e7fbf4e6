// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::generate::generate_handler;
use super::handlers::{health_handler, root_handler};
use super::history::history_handler;
use crate::diffusion::DiffusionEngine;
use crate::history::HistoryStore;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<DiffusionEngine>,
    pub history: Arc<HistoryStore>,
}

impl AppState {
    pub fn new(engine: Arc<DiffusionEngine>, history: Arc<HistoryStore>) -> Self {
        Self { engine, history }
    }
}

/// Build the service router with permissive CORS and request tracing
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Service description
        .route("/", get(root_handler))
        // Health check
        .route("/health", get(health_handler))
        // Image generation endpoint
        .route("/generate", post(generate_handler))
        // Generation history
        .route("/history", get(history_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until the process exits
pub async fn start_server(addr: &str, state: AppState) -> anyhow::Result<()> {
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
