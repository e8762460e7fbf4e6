// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Tests for the diffusion runtime sidecar client

use fabstir_image_node::diffusion::{
    DiffusionBackend, RuntimeHealth, SamplingParams, SidecarClient,
};
use std::time::Duration;

fn client(endpoint: &str) -> SidecarClient {
    SidecarClient::new(endpoint, Duration::from_secs(2)).unwrap()
}

#[test]
fn test_trailing_slash_trimmed() {
    let client = client("http://localhost:8082/");
    assert_eq!(client.endpoint(), "http://localhost:8082");
}

#[test]
fn test_endpoint_kept_verbatim_otherwise() {
    let client = client("http://127.0.0.1:9090");
    assert_eq!(client.endpoint(), "http://127.0.0.1:9090");
}

#[test]
fn test_runtime_health_deserialization() {
    let json = serde_json::json!({ "status": "ok", "cuda_available": true });
    let health: RuntimeHealth = serde_json::from_value(json).unwrap();
    assert_eq!(health.status, "ok");
    assert!(health.cuda_available);
}

#[test]
fn test_runtime_health_cuda_defaults_to_false() {
    let json = serde_json::json!({ "status": "ok" });
    let health: RuntimeHealth = serde_json::from_value(json).unwrap();
    assert!(!health.cuda_available);
}

#[tokio::test]
async fn test_health_unreachable_returns_error() {
    let client = client("http://127.0.0.1:59999");
    assert!(client.runtime_health().await.is_err());
    assert!(client.accelerator_available().await.is_err());
}

#[tokio::test]
async fn test_generate_unreachable_returns_error() {
    let client = client("http://127.0.0.1:59999");
    let result = client
        .generate(
            "runwayml/stable-diffusion-v1-5",
            "a cabin",
            &SamplingParams::default(),
        )
        .await;
    assert!(result.is_err());
}
