//! Sensor Frame

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Three-axis reading (accelerometer in m/s², gyroscope in rad/s)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean norm of the vector
    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// GPS fix with ground speed
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GpsReading {
    /// Latitude (degrees)
    pub latitude: f64,
    /// Longitude (degrees)
    pub longitude: f64,
    /// Ground speed (km/h)
    pub speed: f64,
}

impl GpsReading {
    pub fn location(&self) -> Location {
        Location {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// Geographic position reported with a prediction
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// One fully populated telemetry sample.
///
/// Built by the preprocessor; every field is present and finite. The
/// serialized form is itself a valid preprocessor input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorFrame {
    pub timestamp: DateTime<Utc>,
    pub acceleration: Vector3,
    pub gyroscope: Vector3,
    pub gps: GpsReading,
    /// Ambient sound level (dB)
    pub audio_level: f64,
}

impl SensorFrame {
    /// Frame stamped with the current instant and all readings zeroed
    pub fn now() -> Self {
        Self::at(Utc::now())
    }

    /// Frame stamped with `timestamp` and all readings zeroed
    pub fn at(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            acceleration: Vector3::default(),
            gyroscope: Vector3::default(),
            gps: GpsReading::default(),
            audio_level: 0.0,
        }
    }

    pub fn with_acceleration(mut self, acceleration: Vector3) -> Self {
        self.acceleration = acceleration;
        self
    }

    pub fn with_gyroscope(mut self, gyroscope: Vector3) -> Self {
        self.gyroscope = gyroscope;
        self
    }

    pub fn with_gps(mut self, gps: GpsReading) -> Self {
        self.gps = gps;
        self
    }

    pub fn with_audio_level(mut self, audio_level: f64) -> Self {
        self.audio_level = audio_level;
        self
    }

    /// Current ground speed (km/h)
    pub fn speed(&self) -> f64 {
        self.gps.speed
    }

    pub fn location(&self) -> Location {
        self.gps.location()
    }
}
