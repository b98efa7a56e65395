//! Validation Error Types

use thiserror::Error;

/// Errors raised when a raw telemetry record cannot become a sensor frame
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Record is not valid JSON
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// Record or sensor group is not a JSON object
    #[error("{field} must be an object, got {found}")]
    NotAnObject { field: &'static str, found: String },

    /// Field is present but cannot be read as a number
    #[error("{field} value {value} is not a number")]
    NotNumeric { field: &'static str, value: String },

    /// Field parsed to NaN or infinity
    #[error("{field} value {value} is not finite")]
    NonFinite { field: &'static str, value: f64 },

    /// Timestamp is present but not an ISO-8601 date-time
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

impl ValidationError {
    /// Name of the offending field, if the error concerns one
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::NotAnObject { field, .. }
            | ValidationError::NotNumeric { field, .. }
            | ValidationError::NonFinite { field, .. } => Some(field),
            ValidationError::InvalidTimestamp(_) => Some("timestamp"),
            ValidationError::InvalidJson(_) => None,
        }
    }
}
