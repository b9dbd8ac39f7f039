//! ArchLens server binary
//!
//! Loads configuration once, builds the model client and grounding provider,
//! and serves the evaluation API until Ctrl-C or SIGTERM.

use std::sync::Arc;

use anyhow::Context;
use archlens::api::create_router;
use archlens::{ArchLensConfig, Evaluator};
use llm::remote::OpenRouterClient;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing/logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("Loading server configuration...");
    let config = ArchLensConfig::load().context("failed to load configuration")?;

    tracing::info!(
        base_url = %config.model.base_url,
        model = %config.model.model,
        temperature = config.model.temperature,
        "Model provider configured"
    );

    let client = OpenRouterClient::new(config.llm_config()?)?;

    let grounding = config.grounding_provider()?;
    if grounding.is_empty() {
        tracing::warn!("No grounding documents configured; every prompt will use the no-reference-context branch");
    } else {
        let sources: Vec<_> = grounding.sources().map(|s| s.to_string()).collect();
        tracing::info!(sources = ?sources, "Grounding documents loaded");
    }

    let evaluator = Evaluator::new(Arc::new(client))
        .with_grounding(Arc::new(grounding))
        .with_temperature(config.model.temperature);

    let app = create_router(Arc::new(evaluator), &config.server.cors_origins);

    let addr = config.socket_addr()?;
    tracing::info!("Starting archlens server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("ArchLens server shut down gracefully");
    Ok(())
}

/// Signal for graceful shutdown (Ctrl-C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install CTRL-C signal handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received CTRL-C signal, shutting down");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, shutting down");
        }
    }
}
