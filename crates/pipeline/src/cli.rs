//! Command-line interface

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "accident-detect")]
#[command(about = "Score newline-delimited JSON telemetry for vehicle accidents", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Settings file path (TOML, YAML or JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
