//! Feature Vector Assembly

use serde::{Deserialize, Serialize};
use telemetry::{reference_speed, SensorFrame};

/// Number of features in the vector
pub const FEATURE_DIMENSION: usize = 11;

/// Feature names in vector order
pub const FEATURE_NAMES: [&str; FEATURE_DIMENSION] = [
    "accel_x",
    "accel_y",
    "accel_z",
    "accel_magnitude",
    "gyro_x",
    "gyro_y",
    "gyro_z",
    "gyro_magnitude",
    "speed",
    "speed_change",
    "audio_level",
];

/// Feature vector for classifier inference
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub accel_x: f64,
    pub accel_y: f64,
    pub accel_z: f64,
    pub accel_magnitude: f64,
    pub gyro_x: f64,
    pub gyro_y: f64,
    pub gyro_z: f64,
    pub gyro_magnitude: f64,
    /// Current speed (km/h)
    pub speed: f64,
    /// Current speed minus the recent mean; negative when decelerating
    pub speed_change: f64,
    pub audio_level: f64,
}

impl FeatureVector {
    /// Extract features from a frame and the speeds that preceded it.
    ///
    /// `speed_change` is 0.0 until the history holds two readings.
    pub fn extract(frame: &SensorFrame, speed_history: &[f64]) -> Self {
        let speed = frame.speed();
        let speed_change = reference_speed(speed_history).map_or(0.0, |mean| speed - mean);

        Self {
            accel_x: frame.acceleration.x,
            accel_y: frame.acceleration.y,
            accel_z: frame.acceleration.z,
            accel_magnitude: frame.acceleration.magnitude(),
            gyro_x: frame.gyroscope.x,
            gyro_y: frame.gyroscope.y,
            gyro_z: frame.gyroscope.z,
            gyro_magnitude: frame.gyroscope.magnitude(),
            speed,
            speed_change,
            audio_level: frame.audio_level,
        }
    }

    /// Values in [`FEATURE_NAMES`] order
    pub fn as_array(&self) -> [f64; FEATURE_DIMENSION] {
        [
            self.accel_x,
            self.accel_y,
            self.accel_z,
            self.accel_magnitude,
            self.gyro_x,
            self.gyro_y,
            self.gyro_z,
            self.gyro_magnitude,
            self.speed,
            self.speed_change,
            self.audio_level,
        ]
    }
}
