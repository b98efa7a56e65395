//! Accident Detection Pipeline
//!
//! Reads newline-delimited JSON telemetry, keeps a speed history per vehicle
//! and writes one prediction per frame.

use anyhow::Context;
use inference_engine::{InferenceEngine, LinearModel};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod cli;
mod settings;
mod stream;

pub use accident_detection::AccidentDetector;
pub use cli::Cli;
pub use settings::{Settings, DEFAULT_CONFIG_FILE, ENV_PREFIX};
pub use stream::{process_stream, SessionStore, StreamSummary, DEFAULT_SESSION};

/// Initialize logging on stderr, leaving stdout for predictions
pub fn init_logging(settings: &Settings) -> anyhow::Result<()> {
    let level: Level = settings
        .log_level
        .parse()
        .with_context(|| format!("Invalid log level: {}", settings.log_level))?;

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    let installed = if settings.log_json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };

    installed.context("Failed to set tracing subscriber")
}

/// Build the detector, attaching the classifier when one is configured
pub fn build_detector(settings: &Settings) -> anyhow::Result<AccidentDetector> {
    let detector = AccidentDetector::new(settings.fusion.clone());

    match &settings.model_path {
        Some(path) => {
            let model = LinearModel::load(path)
                .with_context(|| format!("Failed to load model from {}", path.display()))?;
            Ok(detector.with_model(InferenceEngine::new(model)))
        }
        None => Ok(detector),
    }
}

/// Run the pipeline over stdin and stdout
pub async fn run(settings: &Settings) -> anyhow::Result<StreamSummary> {
    let detector = build_detector(settings)?;
    let mut sessions = SessionStore::new(settings.history_capacity, settings.max_sessions);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();

    process_stream(&detector, &mut sessions, stdin, stdout).await
}
