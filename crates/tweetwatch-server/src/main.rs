//! Tweetwatch
//!
//! Serves the disaster tweet classifier over HTTP. The process refuses to bind
//! until both artifacts and the page templates have loaded.

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tweetwatch_server::telemetry::{init_metrics, init_tracing};
use tweetwatch_server::{run_server, shutdown_signal, AppState, Cli, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    info!("Starting Tweetwatch");

    let config = ServerConfig::load(&cli.config, &cli)?;
    info!("Configuration loaded successfully");
    info!("Classifier: {}", config.artifacts.classifier.display());
    info!("Vectorizer: {}", config.artifacts.vectorizer.display());
    info!("Echo text: {}", config.echo_text);

    let metrics_handle = init_metrics()?;

    let addr = config.socket_addr()?;

    // Artifact failures end the process here, before anything is bound
    let state = AppState::initialize(config, Some(metrics_handle))?;
    info!("Application state initialized successfully");

    run_server(state, addr, shutdown_signal()).await?;

    info!("Server shutdown complete");
    Ok(())
}
