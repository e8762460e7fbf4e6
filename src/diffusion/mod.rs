// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image generation via a Stable Diffusion runtime sidecar

pub mod client;
pub mod engine;
pub mod image_utils;
pub mod prompt;

pub use client::{RuntimeHealth, SidecarClient};
pub use engine::{
    DiffusionBackend, DiffusionEngine, GeneratedImage, PipelineHandle, PipelineOptions, Precision,
    SamplingParams,
};
pub use image_utils::{decode_base64_png, encode_png_data_uri, ImageError, ImageInfo};
pub use prompt::{enhance_prompt, NEGATIVE_PROMPT, QUALITY_SUFFIX};
