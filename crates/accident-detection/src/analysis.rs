//! Analysis and prediction results

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use telemetry::Location;

use crate::fusion::Severity;

/// Sensor channel scored by one analyzer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Acceleration,
    Gyroscope,
    Speed,
    Audio,
}

impl Channel {
    /// All channels in fusion order
    pub const ALL: [Channel; 4] = [
        Channel::Acceleration,
        Channel::Gyroscope,
        Channel::Speed,
        Channel::Audio,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Acceleration => "acceleration",
            Channel::Gyroscope => "gyroscope",
            Channel::Speed => "speed",
            Channel::Audio => "audio",
        }
    }
}

/// One analyzer's verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Accident likelihood for this channel, always in [0, 1]
    pub confidence: f64,
    /// Human-readable finding
    pub description: String,
}

impl AnalysisResult {
    pub fn new(confidence: f64, description: impl Into<String>) -> Self {
        Self {
            confidence: if confidence.is_nan() {
                0.0
            } else {
                confidence.clamp(0.0, 1.0)
            },
            description: description.into(),
        }
    }

    /// A finding that carries no accident evidence
    pub fn normal(description: impl Into<String>) -> Self {
        Self::new(0.0, description)
    }

    /// Whether this channel crossed its threshold
    pub fn is_triggered(&self) -> bool {
        self.confidence > 0.0
    }
}

/// Per-channel results, serialized as a map keyed by channel name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelAnalysis {
    pub acceleration: AnalysisResult,
    pub gyroscope: AnalysisResult,
    pub speed: AnalysisResult,
    pub audio: AnalysisResult,
}

impl ChannelAnalysis {
    pub fn get(&self, channel: Channel) -> &AnalysisResult {
        match channel {
            Channel::Acceleration => &self.acceleration,
            Channel::Gyroscope => &self.gyroscope,
            Channel::Speed => &self.speed,
            Channel::Audio => &self.audio,
        }
    }

    /// Results in fusion order
    pub fn iter(&self) -> impl Iterator<Item = (Channel, &AnalysisResult)> {
        Channel::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    /// Channels whose analyzers crossed their thresholds
    pub fn triggered(&self) -> Vec<Channel> {
        self.iter()
            .filter(|(_, result)| result.is_triggered())
            .map(|(channel, _)| channel)
            .collect()
    }
}

/// Complete judgment for one telemetry frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub is_accident: bool,
    /// Weighted fusion of channel confidences, in [0, 1]
    pub confidence_score: f64,
    pub severity: Severity,
    pub timestamp: DateTime<Utc>,
    pub location: Location,
    pub analysis: ChannelAnalysis,
    /// Emergency actions in display order
    pub recommendations: Vec<String>,
    /// Probability from an attached classifier; never affects the fields above
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_probability: Option<f64>,
}

impl PredictionResult {
    /// Whether the frame warrants emergency handling
    pub fn requires_response(&self) -> bool {
        self.severity >= Severity::Moderate
    }
}
