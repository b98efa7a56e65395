//! Feature Engineering Engine
//!
//! Flattens a sensor frame and its speed context into the fixed-order
//! feature vector consumed by trained accident classifiers.

mod features;

pub use features::{FeatureVector, FEATURE_DIMENSION, FEATURE_NAMES};
