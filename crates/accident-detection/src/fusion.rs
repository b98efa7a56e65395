//! Weighted confidence fusion and severity classification

use serde::{Deserialize, Serialize};

use crate::analysis::ChannelAnalysis;
use crate::config::FusionWeights;

/// Lowest aggregate confidence classified as [`Severity::Severe`]
pub const SEVERE_THRESHOLD: f64 = 0.8;

/// Lowest aggregate confidence classified as [`Severity::Moderate`]
pub const MODERATE_THRESHOLD: f64 = 0.6;

/// Lowest aggregate confidence classified as [`Severity::Minor`]
pub const MINOR_THRESHOLD: f64 = 0.4;

/// Accident severity tier
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    #[default]
    None,
    Minor,
    Moderate,
    Severe,
}

impl Severity {
    /// Classify an aggregate confidence; lower bounds are inclusive
    pub fn from_confidence(aggregate: f64) -> Self {
        if aggregate >= SEVERE_THRESHOLD {
            Severity::Severe
        } else if aggregate >= MODERATE_THRESHOLD {
            Severity::Moderate
        } else if aggregate >= MINOR_THRESHOLD {
            Severity::Minor
        } else {
            Severity::None
        }
    }

    pub fn is_accident(&self) -> bool {
        *self != Severity::None
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::None => "NONE",
            Severity::Minor => "MINOR",
            Severity::Moderate => "MODERATE",
            Severity::Severe => "SEVERE",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate confidence and its tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusionOutcome {
    pub aggregate: f64,
    pub severity: Severity,
}

impl FusionOutcome {
    pub fn is_accident(&self) -> bool {
        self.severity.is_accident()
    }
}

/// Weighted sum of channel confidences in fixed channel order, clamped to [0, 1]
pub fn aggregate(analysis: &ChannelAnalysis, weights: &FusionWeights) -> f64 {
    analysis
        .iter()
        .fold(0.0, |acc, (channel, result)| {
            acc + result.confidence * weights.weight(channel)
        })
        .clamp(0.0, 1.0)
}

/// Fuse channel results into an aggregate confidence and severity
pub fn fuse(analysis: &ChannelAnalysis, weights: &FusionWeights) -> FusionOutcome {
    let aggregate = aggregate(analysis, weights);
    FusionOutcome {
        aggregate,
        severity: Severity::from_confidence(aggregate),
    }
}
