//! # Nanos Server
//!
//! Boots the built-in services and runs until Ctrl+C.
//!
//! ## Startup Sequence
//!
//! 1. Initialize telemetry (from env)
//! 2. Load boot configuration (from env)
//! 3. Boot the container on a blocking thread
//! 4. Wait for Ctrl+C, then stop services in reverse start order

use anyhow::{Context, Result};
use nanos_boot::{boot, BootConfig};
use nanos_telemetry::{init_telemetry, TelemetryConfig};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    init_telemetry(&TelemetryConfig::from_env()).context("Failed to initialize telemetry")?;

    let config = BootConfig::from_env();
    info!("HTTP address: {}", config.http_addr());

    let nanos = tokio::task::spawn_blocking(move || boot(config))
        .await
        .context("Boot task panicked")?
        .context("Boot failed")?;

    let report = serde_json::to_string(nanos.report()).context("Failed to encode boot report")?;
    info!(report = %report, "Boot complete");
    if !nanos.report().is_healthy() {
        warn!(
            "{} service(s) failed to start; continuing without them",
            nanos.report().failed.len()
        );
    }

    info!("Nanos is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    tokio::task::spawn_blocking(move || nanos.shutdown())
        .await
        .context("Shutdown task panicked")?;

    Ok(())
}
