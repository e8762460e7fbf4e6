// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Diffusion pipeline gateway: lazy one-shot load plus fixed-parameter generation

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use super::image_utils::decode_base64_png;
use super::prompt::{enhance_prompt, NEGATIVE_PROMPT};

/// Numeric precision the pipeline weights are loaded in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    Float16,
    Float32,
}

impl Precision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Precision::Float16 => "float16",
            Precision::Float32 => "float32",
        }
    }
}

/// Options sent to the runtime when loading the pipeline
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Model identifier, e.g. "runwayml/stable-diffusion-v1-5"
    pub model_id: String,
    /// Weight precision: float16 on accelerated hardware, float32 otherwise
    pub precision: Precision,
    /// Content-safety filtering stage; disabled for this node
    pub safety_checker: bool,
    /// Memory-saving attention mode, enabled on accelerated hardware
    pub attention_slicing: bool,
}

/// The cached pipeline handle. Created once per process, never reloaded.
#[derive(Debug, Clone)]
pub struct PipelineHandle {
    pub model_id: String,
    /// "cuda" or "cpu"
    pub device: String,
    pub precision: Precision,
    pub attention_slicing: bool,
}

impl PipelineHandle {
    pub fn on_gpu(&self) -> bool {
        self.device == "cuda"
    }
}

/// Fixed sampling parameters for every generation
#[derive(Debug, Clone)]
pub struct SamplingParams {
    pub steps: u32,
    pub guidance_scale: f32,
    pub width: u32,
    pub height: u32,
    pub negative_prompt: String,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            steps: 30,
            guidance_scale: 7.5,
            width: 512,
            height: 512,
            negative_prompt: NEGATIVE_PROMPT.to_string(),
        }
    }
}

/// A generated image. In-memory only, never persisted.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    /// Raw PNG bytes
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub processing_time_ms: u64,
}

/// Seam between the gateway and the diffusion runtime.
///
/// Implemented by [`SidecarClient`](super::client::SidecarClient) in
/// production; tests substitute an in-process stub.
#[async_trait]
pub trait DiffusionBackend: Send + Sync {
    /// Whether the runtime has accelerated hardware available
    async fn accelerator_available(&self) -> Result<bool>;

    /// Load the pipeline with the given options
    async fn load_pipeline(&self, options: &PipelineOptions) -> Result<()>;

    /// Run one generation and return the base64-encoded PNG
    async fn generate(
        &self,
        model_id: &str,
        prompt: &str,
        params: &SamplingParams,
    ) -> Result<String>;
}

/// Gateway owning the single pipeline handle for the process lifetime.
///
/// Initialization is guarded by a one-shot cell: concurrent cold calls
/// collapse into a single construction, and a failed load is retried on the
/// next call instead of being cached.
pub struct DiffusionEngine {
    backend: Arc<dyn DiffusionBackend>,
    model_id: String,
    pipeline: OnceCell<PipelineHandle>,
}

impl DiffusionEngine {
    pub fn new(backend: Arc<dyn DiffusionBackend>, model_id: impl Into<String>) -> Self {
        Self {
            backend,
            model_id: model_id.into(),
            pipeline: OnceCell::new(),
        }
    }

    /// Load the pipeline if it isn't loaded yet and return the cached handle.
    pub async fn ensure_loaded(&self) -> Result<&PipelineHandle> {
        self.pipeline
            .get_or_try_init(|| async {
                info!("Loading Stable Diffusion pipeline: {}", self.model_id);

                let gpu = self.backend.accelerator_available().await?;
                let options = PipelineOptions {
                    model_id: self.model_id.clone(),
                    precision: if gpu {
                        Precision::Float16
                    } else {
                        Precision::Float32
                    },
                    safety_checker: false,
                    attention_slicing: gpu,
                };

                self.backend
                    .load_pipeline(&options)
                    .await
                    .context("failed to load diffusion pipeline")?;

                let handle = PipelineHandle {
                    model_id: options.model_id,
                    device: if gpu { "cuda" } else { "cpu" }.to_string(),
                    precision: options.precision,
                    attention_slicing: options.attention_slicing,
                };

                info!(
                    "Pipeline loaded: model={}, device={}, precision={}",
                    handle.model_id,
                    handle.device,
                    handle.precision.as_str()
                );
                Ok(handle)
            })
            .await
    }

    /// Generate one image from a user prompt.
    ///
    /// Applies the fixed quality suffix, negative prompt, and sampling
    /// parameters, then blocks until the runtime finishes. Any runtime
    /// failure propagates to the caller.
    pub async fn generate(&self, prompt: &str) -> Result<GeneratedImage> {
        let handle = self.ensure_loaded().await?;

        let enhanced = enhance_prompt(prompt);
        let params = SamplingParams::default();

        debug!("Generating image for prompt: {}", enhanced);
        let start = Instant::now();

        let base64_png = self
            .backend
            .generate(&handle.model_id, &enhanced, &params)
            .await?;

        let (png, info) =
            decode_base64_png(&base64_png).context("runtime returned an invalid image payload")?;

        let elapsed_ms = start.elapsed().as_millis() as u64;
        info!(
            "Image generated: {}x{}, {} bytes, {}ms",
            info.width,
            info.height,
            info.size_bytes,
            elapsed_ms
        );

        Ok(GeneratedImage {
            png,
            width: info.width,
            height: info.height,
            processing_time_ms: elapsed_ms,
        })
    }

    /// Whether the pipeline handle has been constructed yet
    pub fn model_loaded(&self) -> bool {
        self.pipeline.initialized()
    }

    /// Whether the loaded pipeline sits on accelerated hardware.
    /// Reports `false` until the handle exists.
    pub fn gpu_available(&self) -> bool {
        self.pipeline.get().map(|h| h.on_gpu()).unwrap_or(false)
    }

    /// The configured model identifier
    pub fn model_id(&self) -> &str {
        &self.model_id
    }
}
