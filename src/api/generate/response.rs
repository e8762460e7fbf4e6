// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Generation response type

use serde::{Deserialize, Serialize};

/// Response from image generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub success: bool,
    /// Base64 PNG data URI ("data:image/png;base64,...")
    pub image: String,
    /// The prompt as submitted
    pub prompt: String,
    /// The prompt actually sent to the pipeline
    pub enhanced_prompt: String,
    /// Generation timestamp, RFC 3339
    pub timestamp: String,
    /// Present when the generation succeeded but the history save failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl GenerateResponse {
    pub fn new(
        image: String,
        prompt: String,
        enhanced_prompt: String,
        timestamp: String,
        warning: Option<String>,
    ) -> Self {
        Self {
            success: true,
            image,
            prompt,
            enhanced_prompt,
            timestamp,
            warning,
        }
    }
}
