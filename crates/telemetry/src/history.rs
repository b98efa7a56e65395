//! Bounded Speed History

use serde::{Deserialize, Serialize};

/// Default number of speed readings kept per session
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// Most recent readings averaged for the reference speed
pub const SPEED_WINDOW: usize = 3;

/// Readings required before a reference speed exists
pub const MIN_SPEED_HISTORY: usize = 2;

/// Smallest capacity that still covers [`SPEED_WINDOW`]
pub const MIN_HISTORY_CAPACITY: usize = SPEED_WINDOW;

/// Mean of the last [`SPEED_WINDOW`] speeds, or `None` while fewer than
/// [`MIN_SPEED_HISTORY`] are known.
pub fn reference_speed(history: &[f64]) -> Option<f64> {
    if history.len() < MIN_SPEED_HISTORY {
        return None;
    }
    let recent = &history[history.len().saturating_sub(SPEED_WINDOW)..];
    Some(recent.iter().sum::<f64>() / recent.len() as f64)
}

/// Append-only window of past speeds (km/h), oldest first.
///
/// Owned by the caller, typically one per vehicle session. Detection code
/// only ever borrows it through [`SpeedHistory::as_slice`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedHistory {
    readings: Vec<f64>,
    capacity: usize,
}

impl SpeedHistory {
    /// Create an empty history holding at most `capacity` readings
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(MIN_HISTORY_CAPACITY);
        Self {
            readings: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a reading, evicting the oldest when full
    pub fn push(&mut self, speed: f64) {
        if self.readings.len() >= self.capacity {
            self.readings.remove(0);
        }
        self.readings.push(speed);
    }

    /// Readings in arrival order
    pub fn as_slice(&self) -> &[f64] {
        &self.readings
    }

    /// The last `count` readings (fewer if not yet available)
    pub fn recent(&self, count: usize) -> &[f64] {
        let start = self.readings.len().saturating_sub(count);
        &self.readings[start..]
    }

    /// See [`reference_speed`]
    pub fn reference_speed(&self) -> Option<f64> {
        reference_speed(&self.readings)
    }

    pub fn latest(&self) -> Option<f64> {
        self.readings.last().copied()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.readings.clear();
    }
}

impl Default for SpeedHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl AsRef<[f64]> for SpeedHistory {
    fn as_ref(&self) -> &[f64] {
        self.as_slice()
    }
}
