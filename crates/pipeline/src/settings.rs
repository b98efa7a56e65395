//! Pipeline settings

use std::path::{Path, PathBuf};

use accident_detection::FusionConfig;
use config::{Config, Environment, File};
use serde::Deserialize;
use telemetry::DEFAULT_HISTORY_CAPACITY;

use crate::stream::DEFAULT_MAX_SESSIONS;

/// Settings file looked up in the working directory (any supported extension)
pub const DEFAULT_CONFIG_FILE: &str = "accident-detect";

/// Prefix for environment overrides, e.g. `ACCIDENT_LOG_LEVEL=debug`
pub const ENV_PREFIX: &str = "ACCIDENT";

/// Runtime settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Detection thresholds and fusion weights
    pub fusion: FusionConfig,
    /// Speed readings kept per vehicle session
    pub history_capacity: usize,
    /// Vehicle sessions kept before the least recently seen one is dropped
    pub max_sessions: usize,
    /// Minimum log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
    /// Optional JSON linear classifier
    pub model_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fusion: FusionConfig::default(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            max_sessions: DEFAULT_MAX_SESSIONS,
            log_level: "info".to_string(),
            log_json: false,
            model_path: None,
        }
    }
}

impl Settings {
    /// Layer defaults, the optional settings file, an explicit file, and the environment
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder =
            Config::builder().add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false));

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
