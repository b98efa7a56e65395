//! Telemetry Types
//!
//! Canonical sensor frame and caller-owned speed history shared by the
//! preprocessing, feature, and detection crates.

mod frame;
mod history;

pub use frame::{GpsReading, Location, SensorFrame, Vector3};
pub use history::{
    reference_speed, SpeedHistory, DEFAULT_HISTORY_CAPACITY, MIN_HISTORY_CAPACITY,
    MIN_SPEED_HISTORY, SPEED_WINDOW,
};
