//! Confirmation builder configuration.
//!
//! Sources are applied in order, later ones overriding earlier ones:
//!  1. built-in defaults
//!  2. an optional YAML/TOML/JSON file
//!  3. environment variables prefixed `QUEUE_CLIENT__`
//!     (e.g. `QUEUE_CLIENT__MAX_CONFIRMATIONS=500`)

use crate::error::ConfigurationError;
use crate::protocol::MAX_CONFIRMATIONS_PER_BATCH;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Prefix of environment variables read by [`ConfirmBuilderConfig::load`]
pub const ENV_PREFIX: &str = "QUEUE_CLIENT";

/// Tuning for [`ConfirmEventBuilder`](crate::confirm::ConfirmEventBuilder)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfirmBuilderConfig {
    /// Records allowed in one blob; never above the wire limit
    pub max_confirmations: usize,
    /// Emit a `warn` event whenever an addition is rejected
    pub log_rejections: bool,
}

impl Default for ConfirmBuilderConfig {
    fn default() -> Self {
        Self {
            max_confirmations: MAX_CONFIRMATIONS_PER_BATCH,
            log_rejections: false,
        }
    }
}

impl ConfirmBuilderConfig {
    pub fn with_max_confirmations(mut self, max_confirmations: usize) -> Self {
        self.max_confirmations = max_confirmations;
        self
    }

    pub fn with_log_rejections(mut self, log_rejections: bool) -> Self {
        self.log_rejections = log_rejections;
        self
    }

    /// Load configuration from an optional file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigurationError> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let loaded: Self = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()?;

        loaded.validate()?;
        Ok(loaded)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.max_confirmations == 0 {
            return Err(ConfigurationError::Invalid {
                message: "max_confirmations must be at least 1".to_string(),
            });
        }

        if self.max_confirmations > MAX_CONFIRMATIONS_PER_BATCH {
            return Err(ConfigurationError::Invalid {
                message: format!(
                    "max_confirmations {} exceeds the wire limit of {}",
                    self.max_confirmations, MAX_CONFIRMATIONS_PER_BATCH
                ),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
