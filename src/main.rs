// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use fabstir_image_node::{
    api::{start_server, AppState},
    config::NodeConfig,
    diffusion::{DiffusionEngine, SidecarClient},
    history::HistoryStore,
};
use std::{env, sync::Arc, time::Duration};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    println!("🚀 Starting Fabstir Image Node...\n");
    println!("📦 BUILD VERSION: {}", fabstir_image_node::version::VERSION);
    println!();

    let config = NodeConfig::from_env();
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    println!("🧠 Configuring diffusion gateway...");
    let client = SidecarClient::new(
        &config.diffusion_endpoint,
        Duration::from_secs(config.diffusion_timeout_secs),
    )?;
    let engine = Arc::new(DiffusionEngine::new(Arc::new(client), &config.model_id));

    if config.prewarm {
        println!("📦 Loading Stable Diffusion model: {}", config.model_id);
        match engine.ensure_loaded().await {
            Ok(handle) => {
                println!("✅ Model loaded successfully!");
                println!("   Device:    {}", handle.device);
                println!("   Precision: {}", handle.precision.as_str());
            }
            Err(e) => {
                println!("⚠️  Failed to prewarm model: {}", e);
                println!("   The node will start; the first request retries the load.");
            }
        }
    } else {
        println!("ℹ️  Prewarm disabled (PREWARM=false); model loads on first request");
    }

    let history = Arc::new(HistoryStore::new(&config.history_file));
    println!("🗂️  History file: {}", config.history_file);

    let state = AppState::new(engine, history);

    let separator = "=".repeat(60);
    println!("\n{}", separator);
    println!("🎉 Fabstir Image Node is running!");
    println!("{}", separator);
    println!("API Address:    http://{}", config.api_addr());
    println!("Model:          {}", config.model_id);
    println!("\nAPI Endpoints:");
    println!("  Info:         GET  http://{}/", config.api_addr());
    println!("  Health:       GET  http://{}/health", config.api_addr());
    println!("  Generate:     POST http://{}/generate", config.api_addr());
    println!("  History:      GET  http://{}/history", config.api_addr());
    println!("\nTest with curl:");
    println!("  curl -X POST http://{}/generate \\", config.api_addr());
    println!("    -H 'Content-Type: application/json' \\");
    println!("    -d '{{\"prompt\": \"a minimalist living room\"}}'");
    println!("{}\n", separator);

    start_server(&config.api_addr(), state).await
}
