use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;

use cleanai_core::AppConfig;
use cleanai_web::{bootstrap, logging, routes};

/// Guided dataset upload and assistant chat.
#[derive(Parser, Debug)]
#[command(name = "cleanai", version, about, long_about = None)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Socket address to listen on, overrides `server.bind`
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }

    let state = bootstrap(&config)?;
    let controller = state.controller.clone();
    let app = routes::router(state);

    let listener = TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.server.bind))?;
    tracing::info!("[Main] CleanAI listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    if let Err(e) = controller.shutdown().await {
        tracing::warn!("[Main] Controller already stopped: {}", e);
    }
    tracing::info!("[Main] Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("[Main] Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("[Main] Shutdown requested");
}
