//! Telemetry Preprocessing
//!
//! Turns loosely structured telemetry records into canonical sensor frames.
//! Absent fields take defaults; present but malformed fields reject the record.

mod error;
mod normalizer;

pub use error::ValidationError;
pub use normalizer::{preprocess, preprocess_at, preprocess_str};
