// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod config;
pub mod diffusion;
pub mod history;
pub mod version;

// Re-export main types
pub use api::{ApiError, ErrorResponse};
pub use config::NodeConfig;
pub use diffusion::{
    DiffusionBackend, DiffusionEngine, GeneratedImage, PipelineHandle, PipelineOptions,
    SamplingParams, SidecarClient,
};
pub use history::{HistoryEntry, HistoryStore};
