// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Stable Diffusion runtime sidecar client (OpenAI-compatible image API)

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use super::engine::{DiffusionBackend, PipelineOptions, SamplingParams};

/// Client for the diffusion runtime sidecar
pub struct SidecarClient {
    client: Client,
    endpoint: String,
}

/// Health report from the runtime sidecar
#[derive(Debug, Clone, Deserialize)]
pub struct RuntimeHealth {
    pub status: String,
    #[serde(default)]
    pub cuda_available: bool,
}

// --- OpenAI-compatible response types ---

#[derive(Debug, Deserialize)]
struct ImageApiResponse {
    data: Vec<ImageApiData>,
}

#[derive(Debug, Deserialize)]
struct ImageApiData {
    b64_json: Option<String>,
}

impl SidecarClient {
    /// Create a new client for the given runtime endpoint
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        let endpoint = endpoint.trim_end_matches('/').to_string();
        info!("Diffusion runtime configured: endpoint={}", endpoint);

        Ok(Self { client, endpoint })
    }

    /// The configured endpoint (trailing slash trimmed)
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Probe the runtime's health and device availability
    pub async fn runtime_health(&self) -> Result<RuntimeHealth> {
        let url = format!("{}/health", self.endpoint);
        debug!("Runtime health GET {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "diffusion runtime returned {}: {}",
                status,
                text
            ));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl DiffusionBackend for SidecarClient {
    async fn accelerator_available(&self) -> Result<bool> {
        let health = self.runtime_health().await?;
        Ok(health.cuda_available)
    }

    async fn load_pipeline(&self, options: &PipelineOptions) -> Result<()> {
        let body = serde_json::json!({
            "model": options.model_id,
            "dtype": options.precision.as_str(),
            "safety_checker": options.safety_checker,
            "attention_slicing": options.attention_slicing,
        });

        let url = format!("{}/v1/pipelines/load", self.endpoint);
        debug!("Pipeline load POST {}", url);

        let response = self.client.post(&url).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "diffusion runtime returned {}: {}",
                status,
                text
            ));
        }

        Ok(())
    }

    async fn generate(
        &self,
        model_id: &str,
        prompt: &str,
        params: &SamplingParams,
    ) -> Result<String> {
        let body = serde_json::json!({
            "model": model_id,
            "prompt": prompt,
            "negative_prompt": params.negative_prompt,
            "size": format!("{}x{}", params.width, params.height),
            "n": 1,
            "response_format": "b64_json",
            "guidance_scale": params.guidance_scale,
            "num_inference_steps": params.steps,
        });

        let url = format!("{}/v1/images/generations", self.endpoint);
        debug!("Diffusion generate POST {}", url);

        let response = self.client.post(&url).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "diffusion runtime returned {}: {}",
                status,
                text
            ));
        }

        let api_response: ImageApiResponse = response.json().await?;
        let first = api_response
            .data
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("empty response from diffusion runtime"))?;

        first
            .b64_json
            .ok_or_else(|| anyhow::anyhow!("no b64_json in response"))
    }
}
