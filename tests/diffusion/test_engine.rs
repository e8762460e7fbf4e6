// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Tests for the diffusion gateway's lazy load and generation semantics

use anyhow::Result;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use fabstir_image_node::diffusion::{
    DiffusionBackend, DiffusionEngine, PipelineOptions, Precision, SamplingParams, NEGATIVE_PROMPT,
    QUALITY_SUFFIX,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

const MODEL_ID: &str = "runwayml/stable-diffusion-v1-5";

struct StubBackend {
    gpu: bool,
    fail_load: AtomicBool,
    load_calls: AtomicUsize,
    last_load_options: Mutex<Option<PipelineOptions>>,
    last_prompt: Mutex<Option<String>>,
    last_params: Mutex<Option<SamplingParams>>,
    payload: Mutex<Option<String>>,
}

impl StubBackend {
    fn new(gpu: bool) -> Self {
        Self {
            gpu,
            fail_load: AtomicBool::new(false),
            load_calls: AtomicUsize::new(0),
            last_load_options: Mutex::new(None),
            last_prompt: Mutex::new(None),
            last_params: Mutex::new(None),
            payload: Mutex::new(None),
        }
    }
}

#[async_trait]
impl DiffusionBackend for StubBackend {
    async fn accelerator_available(&self) -> Result<bool> {
        Ok(self.gpu)
    }

    async fn load_pipeline(&self, options: &PipelineOptions) -> Result<()> {
        // Widen the window for racing cold callers
        tokio::time::sleep(Duration::from_millis(20)).await;
        self.load_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_load.load(Ordering::SeqCst) {
            anyhow::bail!("runtime not ready");
        }
        *self.last_load_options.lock().await = Some(options.clone());
        Ok(())
    }

    async fn generate(
        &self,
        _model_id: &str,
        prompt: &str,
        params: &SamplingParams,
    ) -> Result<String> {
        *self.last_prompt.lock().await = Some(prompt.to_string());
        *self.last_params.lock().await = Some(params.clone());
        if let Some(payload) = self.payload.lock().await.clone() {
            return Ok(payload);
        }
        Ok(render_png(params.width, params.height))
    }
}

fn render_png(width: u32, height: u32) -> String {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([64, 96, 128]));
    let mut buf = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, image::ImageFormat::Png)
        .unwrap();
    STANDARD.encode(buf.into_inner())
}

#[tokio::test]
async fn test_ensure_loaded_constructs_once() {
    let backend = Arc::new(StubBackend::new(true));
    let engine = DiffusionEngine::new(backend.clone(), MODEL_ID);

    assert!(!engine.model_loaded());

    engine.ensure_loaded().await.unwrap();
    engine.ensure_loaded().await.unwrap();

    assert!(engine.model_loaded());
    assert_eq!(backend.load_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_concurrent_cold_calls_collapse_into_one_load() {
    let backend = Arc::new(StubBackend::new(true));
    let engine = Arc::new(DiffusionEngine::new(backend.clone(), MODEL_ID));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = engine.clone();
            tokio::spawn(async move { engine.ensure_loaded().await.map(|_| ()) })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(backend.load_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_gpu_load_options() {
    let backend = Arc::new(StubBackend::new(true));
    let engine = DiffusionEngine::new(backend.clone(), MODEL_ID);

    let handle = engine.ensure_loaded().await.unwrap().clone();
    assert_eq!(handle.device, "cuda");
    assert_eq!(handle.precision, Precision::Float16);
    assert!(handle.attention_slicing);
    assert!(engine.gpu_available());

    let options = backend.last_load_options.lock().await.clone().unwrap();
    assert_eq!(options.model_id, MODEL_ID);
    assert_eq!(options.precision, Precision::Float16);
    assert!(options.attention_slicing);
    // Safety filtering is disabled regardless of device
    assert!(!options.safety_checker);
}

#[tokio::test]
async fn test_cpu_load_options() {
    let backend = Arc::new(StubBackend::new(false));
    let engine = DiffusionEngine::new(backend.clone(), MODEL_ID);

    let handle = engine.ensure_loaded().await.unwrap().clone();
    assert_eq!(handle.device, "cpu");
    assert_eq!(handle.precision, Precision::Float32);
    assert!(!handle.attention_slicing);
    assert!(!engine.gpu_available());

    let options = backend.last_load_options.lock().await.clone().unwrap();
    assert_eq!(options.precision, Precision::Float32);
    assert!(!options.safety_checker);
}

#[tokio::test]
async fn test_failed_load_is_retried() {
    let backend = Arc::new(StubBackend::new(false));
    backend.fail_load.store(true, Ordering::SeqCst);
    let engine = DiffusionEngine::new(backend.clone(), MODEL_ID);

    assert!(engine.ensure_loaded().await.is_err());
    assert!(!engine.model_loaded());

    backend.fail_load.store(false, Ordering::SeqCst);
    engine.ensure_loaded().await.unwrap();

    assert!(engine.model_loaded());
    assert_eq!(backend.load_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_generate_applies_fixed_parameters() {
    let backend = Arc::new(StubBackend::new(false));
    let engine = DiffusionEngine::new(backend.clone(), MODEL_ID);

    let image = engine.generate("a timber-frame cabin").await.unwrap();
    assert_eq!(image.width, 512);
    assert_eq!(image.height, 512);
    // Raw bytes are a real PNG
    assert_eq!(&image.png[..4], &[0x89, 0x50, 0x4E, 0x47]);

    let prompt = backend.last_prompt.lock().await.clone().unwrap();
    assert_eq!(prompt, format!("a timber-frame cabin{}", QUALITY_SUFFIX));

    let params = backend.last_params.lock().await.clone().unwrap();
    assert_eq!(params.steps, 30);
    assert!((params.guidance_scale - 7.5).abs() < f32::EPSILON);
    assert_eq!(params.width, 512);
    assert_eq!(params.height, 512);
    assert_eq!(params.negative_prompt, NEGATIVE_PROMPT);
}

#[tokio::test]
async fn test_generate_loads_lazily() {
    let backend = Arc::new(StubBackend::new(false));
    let engine = DiffusionEngine::new(backend.clone(), MODEL_ID);

    assert!(!engine.model_loaded());
    engine.generate("a courtyard").await.unwrap();
    assert!(engine.model_loaded());
    assert_eq!(backend.load_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_generate_rejects_invalid_payload() {
    let backend = Arc::new(StubBackend::new(false));
    *backend.payload.lock().await = Some(STANDARD.encode(b"not a png"));
    let engine = DiffusionEngine::new(backend, MODEL_ID);

    let err = engine.generate("a gazebo").await.unwrap_err();
    assert!(err.to_string().contains("invalid image payload"));
}
