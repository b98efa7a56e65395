//! Accident Detection Pipeline - Main Entry Point

use anyhow::Context;
use clap::Parser;
use pipeline::{init_logging, run, Cli, Settings};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    init_logging(&settings)?;

    info!("=== Accident Detection Pipeline v{} ===", env!("CARGO_PKG_VERSION"));
    info!("Reading telemetry from stdin...");

    let summary = run(&settings).await?;
    info!(
        "Processed {} frames ({} rejected), {} accidents detected",
        summary.frames, summary.rejected, summary.accidents
    );

    Ok(())
}
