//! Assistant server binary
//!
//! Run with: cargo run -p askdesk --bin askdesk-server

use std::path::PathBuf;

use askdesk::{config::AppConfig, server::AskServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "askdesk=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                         AskDesk                           ║
║        Multi-Tab Assistant over Your Documents            ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    // Load configuration (optional TOML path as first argument)
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = AppConfig::load(config_path.as_deref())?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Chunk size: {}", config.chunking.max_chunk_size);
    tracing::info!("  - Max upload: {} bytes", config.server.max_upload_size);
    tracing::info!("  - Retries per dispatch: {}", config.dispatch.max_retries);

    // Check Ollama; the hosted providers need no local daemon
    tracing::info!("Checking Ollama at {}...", config.providers.ollama.base_url);
    let client = reqwest::Client::new();
    match client
        .get(format!("{}/api/tags", config.providers.ollama.base_url))
        .send()
        .await
    {
        Ok(resp) if resp.status().is_success() => {
            tracing::info!("Ollama is running");
        }
        _ => {
            tracing::warn!("Ollama not available at {}", config.providers.ollama.base_url);
            tracing::warn!("Local models will fail until it is started:");
            tracing::warn!("  1. Start: ollama serve");
            tracing::warn!("  2. Pull a model: ollama pull llama3.2");
        }
    }

    // Create and start server
    let server = AskServer::new(config)?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  API Info: http://{}/api/info", server.address());
    println!("\nEndpoints:");
    println!("  POST /api/ask        - Ask over pasted notes");
    println!("  POST /api/ask/upload - Ask over an uploaded file");
    println!("  POST /api/job-match  - Compare a profile to a job posting");
    println!("  GET  /api/tabs       - List tabs and answer styles");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
