//! # Presence Ledger
//!
//! Records entry/exit events from RFID scanners and pushes every change to
//! connected observers.

use anyhow::{Context, Result};
use node_runtime::{load_config, NodeRuntime};
use presence_telemetry::init_telemetry;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config().context("Failed to load configuration")?;
    let _telemetry =
        init_telemetry(config.telemetry.clone()).context("Failed to initialize telemetry")?;

    info!("===========================================");
    info!("  Presence Ledger v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");

    config.validate().context("Invalid configuration")?;

    let mut runtime = NodeRuntime::new(config)?;
    runtime.start().await?;

    info!("Node is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;

    runtime.shutdown().await?;
    info!("Shutdown complete");
    Ok(())
}
