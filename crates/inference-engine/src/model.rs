//! Probability Models

use std::path::Path;

use feature_engine::{FeatureVector, FEATURE_DIMENSION};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::InferenceError;

/// A trained classifier that scores accident likelihood
pub trait ProbabilityModel: Send + Sync {
    /// Probability in [0, 1] that the features describe an accident
    fn probability(&self, features: &FeatureVector) -> Result<f64, InferenceError>;

    /// Short identifier used in logs
    fn name(&self) -> &str {
        "model"
    }
}

/// Logistic regression over standardized features.
///
/// Each feature is scaled as `(x - mean) / scale` before the weighted sum;
/// this matches a standard-scaler plus logistic head export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
    pub weights: Vec<f64>,
    pub bias: f64,
}

impl LinearModel {
    /// Build a model, checking dimensions and scales
    pub fn new(
        mean: Vec<f64>,
        scale: Vec<f64>,
        weights: Vec<f64>,
        bias: f64,
    ) -> Result<Self, InferenceError> {
        let model = Self {
            mean,
            scale,
            weights,
            bias,
        };
        model.validate()?;
        Ok(model)
    }

    /// Parse a model exported as JSON
    pub fn from_json(json: &str) -> Result<Self, InferenceError> {
        let model: Self = serde_json::from_str(json)
            .map_err(|e| InferenceError::ModelLoadError(e.to_string()))?;
        model.validate()?;
        Ok(model)
    }

    /// Load a JSON model from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, InferenceError> {
        let path = path.as_ref();
        info!("Loading accident classifier from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    fn validate(&self) -> Result<(), InferenceError> {
        for (name, values) in [
            ("mean", &self.mean),
            ("scale", &self.scale),
            ("weights", &self.weights),
        ] {
            if values.len() != FEATURE_DIMENSION {
                return Err(InferenceError::InvalidInputShape {
                    expected: FEATURE_DIMENSION,
                    actual: values.len(),
                });
            }
            if values.iter().any(|v| !v.is_finite()) {
                return Err(InferenceError::InvalidModel(format!(
                    "{} contains non-finite values",
                    name
                )));
            }
        }
        if self.scale.iter().any(|s| *s == 0.0) {
            return Err(InferenceError::InvalidModel(
                "scale contains zero entries".to_string(),
            ));
        }
        if !self.bias.is_finite() {
            return Err(InferenceError::InvalidModel("bias is not finite".to_string()));
        }
        Ok(())
    }
}

impl ProbabilityModel for LinearModel {
    fn probability(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        let logit = features
            .as_array()
            .iter()
            .zip(&self.mean)
            .zip(&self.scale)
            .zip(&self.weights)
            .fold(self.bias, |acc, (((x, mean), scale), weight)| {
                acc + weight * (x - mean) / scale
            });
        Ok(1.0 / (1.0 + (-logit).exp()))
    }

    fn name(&self) -> &str {
        "linear"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_model(weights: Vec<f64>, bias: f64) -> LinearModel {
        LinearModel::new(
            vec![0.0; FEATURE_DIMENSION],
            vec![1.0; FEATURE_DIMENSION],
            weights,
            bias,
        )
        .unwrap()
    }

    #[test]
    fn test_zero_logit_is_half() {
        let model = unit_model(vec![0.0; FEATURE_DIMENSION], 0.0);
        let p = model.probability(&FeatureVector::default()).unwrap();
        assert!((p - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_standardization() {
        let mut weights = vec![0.0; FEATURE_DIMENSION];
        weights[10] = 1.0; // audio_level
        let mut mean = vec![0.0; FEATURE_DIMENSION];
        mean[10] = 60.0;
        let mut scale = vec![1.0; FEATURE_DIMENSION];
        scale[10] = 10.0;
        let model = LinearModel::new(mean, scale, weights, 0.0).unwrap();

        let features = FeatureVector {
            audio_level: 80.0,
            ..Default::default()
        };
        // (80 - 60) / 10 = 2
        let expected = 1.0 / (1.0 + (-2.0f64).exp());
        assert!((model.probability(&features).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_wrong_dimension() {
        let result = LinearModel::new(vec![0.0; 3], vec![1.0; 3], vec![0.0; 3], 0.0);
        assert!(matches!(
            result,
            Err(InferenceError::InvalidInputShape {
                expected: FEATURE_DIMENSION,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_rejects_zero_scale() {
        let result = LinearModel::new(
            vec![0.0; FEATURE_DIMENSION],
            vec![0.0; FEATURE_DIMENSION],
            vec![0.0; FEATURE_DIMENSION],
            0.0,
        );
        assert!(matches!(result, Err(InferenceError::InvalidModel(_))));
    }

    #[test]
    fn test_from_json() {
        let model = unit_model(vec![0.5; FEATURE_DIMENSION], -1.0);
        let json = serde_json::to_string(&model).unwrap();
        assert_eq!(LinearModel::from_json(&json).unwrap(), model);

        assert!(matches!(
            LinearModel::from_json("{\"bias\": 1.0}"),
            Err(InferenceError::ModelLoadError(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            LinearModel::load("/nonexistent/accident-model.json"),
            Err(InferenceError::ModelLoadError(_))
        ));
    }
}
