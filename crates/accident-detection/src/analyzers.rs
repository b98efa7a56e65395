//! Per-sensor pattern analyzers
//!
//! Each analyzer is a pure function from the current frame context and the
//! shared configuration to an [`AnalysisResult`]. Thresholds use strict
//! `>` comparisons: a reading exactly at its threshold scores zero.

use telemetry::{reference_speed, SensorFrame};

use crate::analysis::{AnalysisResult, Channel, ChannelAnalysis};
use crate::config::FusionConfig;

/// Multiple of the threshold at which acceleration confidence reaches 1.0
pub const ACCELERATION_SATURATION: f64 = 3.0;

/// Multiple of the threshold at which gyroscope confidence reaches 1.0
pub const GYROSCOPE_SATURATION: f64 = 2.0;

/// Multiple of the threshold at which speed confidence reaches 1.0
pub const SPEED_SATURATION: f64 = 2.0;

/// Sound level mapped to full audio confidence (dB)
pub const AUDIO_FULL_SCALE_DB: f64 = 100.0;

pub use telemetry::{MIN_SPEED_HISTORY, SPEED_WINDOW};

/// Everything an analyzer may read for one evaluation
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    pub frame: &'a SensorFrame,
    /// Past speeds (km/h), oldest first; owned by the caller
    pub speed_history: &'a [f64],
}

impl<'a> FrameContext<'a> {
    pub fn new(frame: &'a SensorFrame, speed_history: &'a [f64]) -> Self {
        Self {
            frame,
            speed_history,
        }
    }
}

/// Common analyzer signature
pub type Analyzer = fn(&FrameContext<'_>, &FusionConfig) -> AnalysisResult;

/// Analyzers in fusion order
pub const ANALYZERS: [(Channel, Analyzer); 4] = [
    (Channel::Acceleration, analyze_acceleration as Analyzer),
    (Channel::Gyroscope, analyze_gyroscope as Analyzer),
    (Channel::Speed, analyze_speed as Analyzer),
    (Channel::Audio, analyze_audio as Analyzer),
];

/// Run every analyzer in [`ANALYZERS`] against one frame
pub fn analyze_all(context: &FrameContext<'_>, config: &FusionConfig) -> ChannelAnalysis {
    let [acceleration, gyroscope, speed, audio] =
        ANALYZERS.map(|(_, analyzer)| analyzer(context, config));
    ChannelAnalysis {
        acceleration,
        gyroscope,
        speed,
        audio,
    }
}

/// Confidence that grows linearly above `threshold` and saturates at
/// `saturation` times the threshold.
pub fn saturating_confidence(value: f64, threshold: f64, saturation: f64) -> f64 {
    if value > threshold {
        (value / threshold).min(saturation) / saturation
    } else {
        0.0
    }
}

/// Sudden impact from the acceleration magnitude
pub fn analyze_acceleration(context: &FrameContext<'_>, config: &FusionConfig) -> AnalysisResult {
    let magnitude = context.frame.acceleration.magnitude();
    let confidence = saturating_confidence(
        magnitude,
        config.thresholds().acceleration,
        ACCELERATION_SATURATION,
    );

    if confidence > 0.0 {
        AnalysisResult::new(
            confidence,
            format!("Sudden impact detected (magnitude: {:.2} m/s²)", magnitude),
        )
    } else {
        AnalysisResult::normal(format!(
            "Normal acceleration pattern (magnitude: {:.2} m/s²)",
            magnitude
        ))
    }
}

/// Rollover or spin from the angular velocity magnitude
pub fn analyze_gyroscope(context: &FrameContext<'_>, config: &FusionConfig) -> AnalysisResult {
    let magnitude = context.frame.gyroscope.magnitude();
    let confidence =
        saturating_confidence(magnitude, config.thresholds().gyroscope, GYROSCOPE_SATURATION);

    if confidence > 0.0 {
        AnalysisResult::new(
            confidence,
            format!("Vehicle rotation detected (magnitude: {:.2} rad/s)", magnitude),
        )
    } else {
        AnalysisResult::normal(format!(
            "Normal rotation pattern (magnitude: {:.2} rad/s)",
            magnitude
        ))
    }
}

/// Absolute difference between `current` and the mean of the last
/// [`SPEED_WINDOW`] history entries, or `None` with too little history.
pub fn speed_change(current: f64, history: &[f64]) -> Option<f64> {
    reference_speed(history).map(|mean| (mean - current).abs())
}

/// Abrupt stop or speed jump against recent history
pub fn analyze_speed(context: &FrameContext<'_>, config: &FusionConfig) -> AnalysisResult {
    let history = context.speed_history;
    let Some(delta) = speed_change(context.frame.speed(), history) else {
        return AnalysisResult::normal(format!(
            "Insufficient data for speed analysis ({} of {} readings)",
            history.len(),
            MIN_SPEED_HISTORY
        ));
    };

    let confidence =
        saturating_confidence(delta, config.thresholds().speed_change, SPEED_SATURATION);

    if confidence > 0.0 {
        AnalysisResult::new(
            confidence,
            format!("Sudden speed change detected ({:.1} km/h)", delta),
        )
    } else {
        AnalysisResult::normal(format!("Normal speed pattern (change: {:.1} km/h)", delta))
    }
}

/// Crash sound from the ambient level
pub fn analyze_audio(context: &FrameContext<'_>, config: &FusionConfig) -> AnalysisResult {
    let level = context.frame.audio_level;

    if level > config.thresholds().audio {
        AnalysisResult::new(
            (level / AUDIO_FULL_SCALE_DB).min(1.0),
            format!("High audio level detected ({:.1} dB)", level),
        )
    } else {
        AnalysisResult::normal(format!("Normal audio level ({:.1} dB)", level))
    }
}
