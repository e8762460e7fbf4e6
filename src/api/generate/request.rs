// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Generation request type and validation

use serde::{Deserialize, Serialize};

fn default_user_id() -> String {
    "anonymous".to_string()
}

/// Request for image generation via POST /generate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Text prompt describing the desired image
    pub prompt: String,

    /// Caller identity used for history attribution
    #[serde(default = "default_user_id")]
    pub user_id: String,
}

impl GenerateRequest {
    /// Validate the generation request
    pub fn validate(&self) -> Result<(), String> {
        if self.prompt.trim().is_empty() {
            return Err("Prompt cannot be empty".to_string());
        }
        Ok(())
    }
}
