//! Fusion configuration

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::Channel;

/// Largest allowed deviation of the weight sum from 1.0
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{name} threshold must be finite and positive, got {value}")]
    InvalidThreshold { name: &'static str, value: f64 },

    #[error("{name} weight must be finite and non-negative, got {value}")]
    InvalidWeight { name: &'static str, value: f64 },

    #[error("Fusion weights must sum to 1.0, got {0}")]
    WeightSum(f64),
}

/// Per-channel detection thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Acceleration magnitude (m/s²)
    pub acceleration: f64,
    /// Angular velocity magnitude (rad/s)
    pub gyroscope: f64,
    /// Speed change against the recent mean (km/h)
    pub speed_change: f64,
    /// Ambient sound level (dB)
    pub audio: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            acceleration: 15.0,
            gyroscope: 5.0,
            speed_change: 30.0,
            audio: 80.0,
        }
    }
}

/// Weights applied to each channel's confidence during fusion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionWeights {
    pub acceleration: f64,
    pub gyroscope: f64,
    pub speed: f64,
    pub audio: f64,
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self {
            acceleration: 0.4,
            gyroscope: 0.3,
            speed: 0.2,
            audio: 0.1,
        }
    }
}

impl FusionWeights {
    /// Weight for one channel
    pub fn weight(&self, channel: Channel) -> f64 {
        match channel {
            Channel::Acceleration => self.acceleration,
            Channel::Gyroscope => self.gyroscope,
            Channel::Speed => self.speed,
            Channel::Audio => self.audio,
        }
    }

    pub fn sum(&self) -> f64 {
        Channel::ALL.iter().map(|c| self.weight(*c)).sum()
    }
}

/// Immutable detection configuration.
///
/// Built once at startup and shared read-only by every evaluation. Fields
/// are private so a validated config can never be altered afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFusionConfig")]
pub struct FusionConfig {
    thresholds: Thresholds,
    weights: FusionWeights,
}

impl FusionConfig {
    /// Validate and build a configuration
    pub fn new(thresholds: Thresholds, weights: FusionWeights) -> Result<Self, ConfigError> {
        for (name, value) in [
            ("acceleration", thresholds.acceleration),
            ("gyroscope", thresholds.gyroscope),
            ("speed_change", thresholds.speed_change),
            ("audio", thresholds.audio),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidThreshold { name, value });
            }
        }

        for channel in Channel::ALL {
            let value = weights.weight(channel);
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidWeight {
                    name: channel.as_str(),
                    value,
                });
            }
        }

        let sum = weights.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::WeightSum(sum));
        }

        Ok(Self {
            thresholds,
            weights,
        })
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn weights(&self) -> &FusionWeights {
        &self.weights
    }
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            weights: FusionWeights::default(),
        }
    }
}

/// Unvalidated form read from configuration sources
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RawFusionConfig {
    thresholds: Thresholds,
    weights: FusionWeights,
}

impl TryFrom<RawFusionConfig> for FusionConfig {
    type Error = ConfigError;

    fn try_from(raw: RawFusionConfig) -> Result<Self, Self::Error> {
        FusionConfig::new(raw.thresholds, raw.weights)
    }
}
