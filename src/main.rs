// ABOUTME: Entry point for the kaizen binary.
// ABOUTME: Loads .env and CLI overrides, initializes tracing, wires the provider chain, and serves HTTP.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use kaizen_agent::{Enricher, HttpCompanyLookup, Pipeline, ProviderChain};
use kaizen_server::{AppState, KaizenConfig, create_router};
use kaizen_store::UploadStore;

/// Kaizen AI API server.
#[derive(Debug, Parser)]
#[command(name = "kaizen", version, about)]
struct Cli {
    /// Port to listen on (overrides PORT).
    #[arg(long)]
    port: Option<u16>,

    /// Directory for uploaded files (overrides KAIZEN_UPLOAD_DIR).
    #[arg(long)]
    upload_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is normal.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("kaizen=debug,tower_http=debug")
            }),
        )
        .init();

    let cli = Cli::parse();

    let mut config = KaizenConfig::from_env().context("invalid configuration")?;
    if let Some(port) = cli.port {
        config.bind.set_port(port);
    }
    if let Some(dir) = cli.upload_dir {
        config.upload_dir = dir;
    }

    let chain = ProviderChain::from_settings(
        config.anthropic.as_ref(),
        config.openai.as_ref(),
        config.provider_timeout,
    )
    .context("failed to build LLM provider clients")?;

    if chain.is_empty() {
        tracing::warn!("no LLM API key configured; analysis endpoints will return errors");
    } else {
        tracing::info!(providers = ?chain.provider_names(), "LLM providers configured");
    }

    let mut pipeline = Pipeline::new(chain);
    if let Some(settings) = config.enrichment.clone() {
        let lookup = HttpCompanyLookup::new(settings).context("failed to build enrichment client")?;
        pipeline = pipeline.with_enricher(Enricher::new(Arc::new(lookup)));
        tracing::info!("company enrichment enabled");
    }

    let uploads = UploadStore::new(&config.upload_dir);
    uploads
        .ensure_dir()
        .await
        .with_context(|| {
            format!(
                "failed to create upload directory {}",
                config.upload_dir.display()
            )
        })?;

    let state = Arc::new(AppState::new(pipeline, uploads));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    tracing::info!(
        addr = %config.bind,
        upload_dir = %config.upload_dir.display(),
        "kaizen listening"
    );

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
