//! Accident Detection Engine
//!
//! Deterministic multi-sensor fusion over a single telemetry frame:
//! - Acceleration magnitude (sudden impacts)
//! - Gyroscope magnitude (rollover, spin)
//! - Speed change against recent history (abrupt stops)
//! - Ambient audio level (crash sounds)
//!
//! Channel confidences are fused with fixed weights into a severity tier and
//! a list of recommended emergency actions.

pub mod analysis;
pub mod analyzers;
pub mod config;
pub mod detector;
pub mod fusion;
pub mod recommendations;

pub use analysis::{AnalysisResult, Channel, ChannelAnalysis, PredictionResult};
pub use analyzers::{analyze_all, Analyzer, FrameContext, ANALYZERS};
pub use config::{ConfigError, FusionConfig, FusionWeights, Thresholds};
pub use detector::{predict, AccidentDetector};
pub use fusion::{fuse, FusionOutcome, Severity};
pub use recommendations::recommendations;

use preprocessor::ValidationError;
use thiserror::Error;

/// Detection error types
#[derive(Error, Debug)]
pub enum DetectionError {
    #[error("Invalid telemetry record: {0}")]
    Validation(#[from] ValidationError),
}
