//! Accident Classifier Inference
//!
//! Optional probability scorer consulted alongside the rule-based detector.
//! Models are plugged in through [`ProbabilityModel`]; [`LinearModel`] reads
//! an exported standardized logistic model from JSON.

mod engine;
mod model;

pub use engine::{InferenceEngine, InferenceResult};
pub use model::{LinearModel, ProbabilityModel};

use thiserror::Error;

/// Errors during inference
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Model load failed: {0}")]
    ModelLoadError(String),
    #[error("Invalid model: {0}")]
    InvalidModel(String),
    #[error("Invalid input shape: expected {expected}, got {actual}")]
    InvalidInputShape { expected: usize, actual: usize },
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
    #[error("Model returned non-finite probability {0}")]
    InvalidOutput(f64),
}

impl From<std::io::Error> for InferenceError {
    fn from(err: std::io::Error) -> Self {
        InferenceError::ModelLoadError(err.to_string())
    }
}
