//! Engine configuration
//!
//! Loaded from a JSON file; every key is optional and falls back to the
//! defaults below.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound for read-side depth pruning.
pub const MAX_READ_DEPTH: usize = 8;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Content engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Locale used when the space has no default locale (default: "en")
    #[serde(default = "default_fallback_locale")]
    pub fallback_locale: String,

    /// Maximum repeater/layout nesting accepted by the compiler (default: 32)
    #[serde(default = "default_max_nesting_depth")]
    pub max_nesting_depth: usize,

    /// Upper clamp for `max_depth` on reads (default: 8)
    #[serde(default = "default_max_read_depth")]
    pub max_read_depth: usize,

    /// Minimum length of password field values (default: 8)
    #[serde(default = "default_password_min_length")]
    pub password_min_length: usize,
}

fn default_fallback_locale() -> String {
    "en".to_string()
}

fn default_max_nesting_depth() -> usize {
    crate::schema::DEFAULT_MAX_NESTING_DEPTH
}

fn default_max_read_depth() -> usize {
    MAX_READ_DEPTH
}

fn default_password_min_length() -> usize {
    8
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fallback_locale: default_fallback_locale(),
            max_nesting_depth: default_max_nesting_depth(),
            max_read_depth: default_max_read_depth(),
            password_min_length: default_password_min_length(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_json(&content)
    }

    /// Parse configuration from a JSON string
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fallback_locale.trim().is_empty() {
            return Err(ConfigError::Invalid("fallback_locale must not be empty".into()));
        }

        if self.max_nesting_depth == 0 {
            return Err(ConfigError::Invalid("max_nesting_depth must be > 0".into()));
        }

        if self.max_read_depth > MAX_READ_DEPTH {
            return Err(ConfigError::Invalid(format!(
                "max_read_depth must be <= {}",
                MAX_READ_DEPTH
            )));
        }

        if self.password_min_length == 0 {
            return Err(ConfigError::Invalid("password_min_length must be > 0".into()));
        }

        Ok(())
    }
}
