//! Inference Engine Implementation

use std::time::Instant;

use feature_engine::FeatureVector;
use tracing::{debug, info};

use crate::model::ProbabilityModel;
use crate::InferenceError;

/// Result of inference operation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InferenceResult {
    /// Accident probability, clamped to [0, 1]
    pub probability: f64,
    /// Inference latency in microseconds
    pub latency_us: u64,
}

/// Runs a probability model and guards its output
pub struct InferenceEngine {
    model: Box<dyn ProbabilityModel>,
}

impl InferenceEngine {
    /// Create a new inference engine
    pub fn new(model: impl ProbabilityModel + 'static) -> Self {
        info!("Creating inference engine with model: {}", model.name());
        Self {
            model: Box::new(model),
        }
    }

    /// Score a feature vector
    pub fn predict(&self, features: &FeatureVector) -> Result<InferenceResult, InferenceError> {
        let start = Instant::now();
        let raw = self.model.probability(features)?;
        if !raw.is_finite() {
            return Err(InferenceError::InvalidOutput(raw));
        }

        let latency_us = start.elapsed().as_micros() as u64;
        debug!("Inference completed in {}us (p={:.3})", latency_us, raw);

        Ok(InferenceResult {
            probability: raw.clamp(0.0, 1.0),
            latency_us,
        })
    }

    /// Name of the wrapped model
    pub fn model_name(&self) -> &str {
        self.model.name()
    }
}

impl std::fmt::Debug for InferenceEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceEngine")
            .field("model", &self.model.name())
            .finish()
    }
}
