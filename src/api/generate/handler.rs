// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image generation endpoint handler

use axum::{extract::State, Json};
use chrono::Utc;
use tracing::{debug, warn};

use super::request::GenerateRequest;
use super::response::GenerateResponse;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::diffusion::image_utils::encode_png_data_uri;
use crate::diffusion::prompt::enhance_prompt;

/// POST /generate - Generate an image from a text prompt
///
/// Pipeline:
/// 1. Validate request (400 on empty prompt, before touching the gateway)
/// 2. Run the diffusion gateway
/// 3. Encode the PNG as a base64 data URI
/// 4. Append to history (best effort; failure becomes a warning field)
/// 5. Build and return the success envelope
pub async fn generate_handler(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    debug!(
        "Image generation request received: prompt_len={}, user_id={}",
        request.prompt.len(),
        request.user_id
    );

    if let Err(e) = request.validate() {
        warn!("Image generation validation failed: {}", e);
        return Err(ApiError::InvalidRequest(e));
    }

    let image = state.engine.generate(&request.prompt).await.map_err(|e| {
        warn!("Image generation failed: {}", e);
        ApiError::InternalError(format!("Error generating image: {}", e))
    })?;

    let data_uri = encode_png_data_uri(&image.png);

    let warning = match state
        .history
        .append(&request.prompt, &request.user_id)
        .await
    {
        Ok(_) => None,
        Err(e) => {
            warn!("Error saving history: {}", e);
            Some(format!("History save failed: {}", e))
        }
    };

    Ok(Json(GenerateResponse::new(
        data_uri,
        request.prompt.clone(),
        enhance_prompt(&request.prompt),
        Utc::now().to_rfc3339(),
        warning,
    )))
}
