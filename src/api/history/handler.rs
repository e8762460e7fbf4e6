// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! History endpoint handler

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use tracing::debug;

use super::response::HistoryResponse;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;

/// Query parameters for GET /history
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryQuery {
    pub user_id: Option<String>,
}

/// GET /history?user_id= - Recent generation history, newest last
///
/// The store already degrades read failures to an empty log, so the error
/// branch below only fires on failures the store does not absorb.
pub async fn history_handler(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    debug!("History request: user_id={:?}", query.user_id);

    let entries = state
        .history
        .read(query.user_id.as_deref())
        .await
        .map_err(|e| ApiError::InternalError(format!("Error loading history: {}", e)))?;

    Ok(Json(HistoryResponse::new(entries)))
}
