// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Static info and health endpoints

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::http_server::AppState;

/// GET / response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
    pub status: String,
    pub endpoints: EndpointList,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointList {
    pub generate: String,
    pub health: String,
    pub history: String,
}

/// GET /health response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub gpu_available: bool,
    pub model_loaded: bool,
}

/// GET / - Static service description
pub async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Fabstir Image Node".to_string(),
        status: "running".to_string(),
        endpoints: EndpointList {
            generate: "POST /generate".to_string(),
            health: "GET /health".to_string(),
            history: "GET /history".to_string(),
        },
    })
}

/// GET /health - Process health plus gateway state
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        gpu_available: state.engine.gpu_available(),
        model_loaded: state.engine.model_loaded(),
    })
}
