//! Accident detector

use feature_engine::FeatureVector;
use inference_engine::InferenceEngine;
use serde_json::Value;
use telemetry::SensorFrame;
use tracing::{debug, info, warn};

use crate::analysis::PredictionResult;
use crate::analyzers::{analyze_all, FrameContext};
use crate::config::FusionConfig;
use crate::fusion::fuse;
use crate::recommendations::recommendation_list;
use crate::DetectionError;

/// Rule-based prediction for one frame.
///
/// Pure and deterministic: the same frame, history and config always give
/// a bit-identical result.
pub fn predict(
    frame: &SensorFrame,
    speed_history: &[f64],
    config: &FusionConfig,
) -> PredictionResult {
    let context = FrameContext::new(frame, speed_history);
    let analysis = analyze_all(&context, config);
    let outcome = fuse(&analysis, config.weights());

    PredictionResult {
        is_accident: outcome.is_accident(),
        confidence_score: outcome.aggregate,
        severity: outcome.severity,
        timestamp: frame.timestamp,
        location: frame.location(),
        analysis,
        recommendations: recommendation_list(outcome.severity),
        model_probability: None,
    }
}

/// Evaluates telemetry frames against a fixed configuration.
///
/// Holds no per-frame state, so one instance can be shared across threads.
#[derive(Debug, Default)]
pub struct AccidentDetector {
    config: FusionConfig,
    engine: Option<InferenceEngine>,
}

impl AccidentDetector {
    pub fn new(config: FusionConfig) -> Self {
        info!("Creating accident detector with config: {:?}", config);
        Self {
            config,
            engine: None,
        }
    }

    /// Attach a classifier whose probability is reported alongside the rules
    pub fn with_model(mut self, engine: InferenceEngine) -> Self {
        info!("Attaching accident classifier: {}", engine.model_name());
        self.engine = Some(engine);
        self
    }

    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    pub fn has_model(&self) -> bool {
        self.engine.is_some()
    }

    /// Evaluate a canonical frame
    pub fn evaluate(&self, frame: &SensorFrame, speed_history: &[f64]) -> PredictionResult {
        let mut result = predict(frame, speed_history, &self.config);
        result.model_probability = self.model_probability(frame, speed_history);

        debug!(
            "Evaluated frame at {}: score={:.3} severity={}",
            result.timestamp, result.confidence_score, result.severity
        );
        if result.is_accident {
            warn!(
                "Accident detected: severity={} score={:.3} at ({:.5}, {:.5}), channels={:?}",
                result.severity,
                result.confidence_score,
                result.location.latitude,
                result.location.longitude,
                result.analysis.triggered()
            );
        }

        result
    }

    /// Preprocess a raw record and evaluate it
    pub fn evaluate_record(
        &self,
        raw: &Value,
        speed_history: &[f64],
    ) -> Result<PredictionResult, DetectionError> {
        let frame = preprocessor::preprocess(raw)?;
        Ok(self.evaluate(&frame, speed_history))
    }

    fn model_probability(&self, frame: &SensorFrame, speed_history: &[f64]) -> Option<f64> {
        let engine = self.engine.as_ref()?;
        let features = FeatureVector::extract(frame, speed_history);
        match engine.predict(&features) {
            Ok(result) => Some(result.probability),
            Err(e) => {
                warn!("Classifier unavailable for this frame: {}", e);
                None
            }
        }
    }
}
