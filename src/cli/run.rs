use crate::config::load_config;
use crate::engine::{run_engine, EngineError, EngineReport};
use crate::transport;
use crate::transport::TransportError;
use std::path::PathBuf;
use thiserror::Error;
use tokio::signal;
use tokio::sync::watch;
use tracing::info;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("task join error: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub async fn run(config_path: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = match config_path {
        Some(path) => path,
        None => {
            eprintln!("Error: config not found");
            eprintln!("Searched locations:");
            eprintln!("  ~/.config/logwind/config.yml");
            eprintln!("  /etc/logwind/config.yml");
            eprintln!("\nUse --config <path> to specify a config file, or run 'logwind config init' to generate one.");
            std::process::exit(1);
        }
    };

    run_service(&config_path).await.map_err(|e| e.into())
}

async fn run_service(config_path: &PathBuf) -> Result<(), RunError> {
    info!(config_path = %config_path.display(), "Loading configuration");
    let config = load_config(config_path)?;

    info!(url = %config.transport.url, "Connecting to transport");
    let (source, sink) =
        transport::redis::connect(&config.transport.url, &config.transport.input_channel).await?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let engine_config = config.clone();
    let mut engine_handle =
        tokio::spawn(async move { run_engine(source, sink, &engine_config, shutdown_rx).await });

    info!("Engine started, press Ctrl+C to shutdown");

    // The engine finishes on its own if the input stream closes or the
    // transport fails; otherwise Ctrl+C triggers a final flush and exit.
    let result = tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received");
            let _ = shutdown_tx.send(true);
            engine_handle.await?
        }
        result = &mut engine_handle => result?,
    };

    let report: EngineReport = result?;
    info!(
        events_decoded = report.events_decoded,
        windows_published = report.windows_published,
        "Shutdown complete"
    );

    Ok(())
}
