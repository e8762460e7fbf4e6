// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Node configuration loaded from environment variables

use std::env;

/// Configuration for the image generation node
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Address the HTTP API binds to
    pub api_host: String,
    /// Port the HTTP API listens on
    pub api_port: u16,
    /// Base URL of the diffusion runtime sidecar
    pub diffusion_endpoint: String,
    /// Model identifier loaded into the pipeline
    pub model_id: String,
    /// Path of the JSON history log
    pub history_file: String,
    /// Transport-level timeout for sidecar requests, in seconds
    pub diffusion_timeout_secs: u64,
    /// Whether to eagerly load the pipeline at startup
    pub prewarm: bool,
}

impl NodeConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            api_host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            api_port: env::var("API_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),
            diffusion_endpoint: env::var("DIFFUSION_ENDPOINT")
                .unwrap_or_else(|_| "http://127.0.0.1:8082".to_string()),
            model_id: env::var("MODEL_ID")
                .unwrap_or_else(|_| "runwayml/stable-diffusion-v1-5".to_string()),
            history_file: env::var("HISTORY_FILE")
                .unwrap_or_else(|_| "generation_history.json".to_string()),
            diffusion_timeout_secs: env::var("DIFFUSION_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(120),
            // Prewarm enabled by default so the first request doesn't pay the load cost
            // Set PREWARM=false to skip
            prewarm: env::var("PREWARM")
                .map(|v| v.to_lowercase() != "false")
                .unwrap_or(true),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.model_id.trim().is_empty() {
            return Err("Model id must not be empty".to_string());
        }
        if self.diffusion_timeout_secs == 0 {
            return Err("Diffusion timeout must be greater than 0".to_string());
        }
        if self.history_file.trim().is_empty() {
            return Err("History file path must not be empty".to_string());
        }
        Ok(())
    }

    /// Socket address string for the API listener
    pub fn api_addr(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            api_host: "0.0.0.0".to_string(),
            api_port: 8000,
            diffusion_endpoint: "http://127.0.0.1:8082".to_string(),
            model_id: "runwayml/stable-diffusion-v1-5".to_string(),
            history_file: "generation_history.json".to_string(),
            diffusion_timeout_secs: 120,
            prewarm: true,
        }
    }
}
