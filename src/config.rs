//! Configuration
//!
//! Loaded from a JSON file. Every field is optional; missing values fall
//! back to the defaults below.
//!
//! ```json
//! {
//!   "data_dir": "./schooldesk-data",
//!   "log_level": "info",
//!   "hashing": { "memory_kib": 19456, "iterations": 2, "parallelism": 1 },
//!   "password_policy": { "min_length": 8 },
//!   "pagination": { "default_limit": 20, "max_limit": 100 }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::auth::{HashingConfig, PasswordPolicy};
use crate::observability::Severity;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {reason}")]
    Read { path: String, reason: String },

    #[error("Invalid config JSON: {0}")]
    Parse(String),

    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchoolConfig {
    /// Directory holding one JSON file per collection
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Minimum severity written by the logger
    #[serde(default = "default_log_level")]
    pub log_level: Severity,

    #[serde(default)]
    pub hashing: HashingConfig,

    #[serde(default)]
    pub password_policy: PasswordPolicy,

    #[serde(default)]
    pub pagination: PaginationConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./schooldesk-data")
}

fn default_log_level() -> Severity {
    Severity::Info
}

impl Default for SchoolConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            hashing: HashingConfig::default(),
            password_policy: PasswordPolicy::default(),
            pagination: PaginationConfig::default(),
        }
    }
}

/// Paging limits for list operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Limit applied when the caller gives none
    #[serde(default = "default_limit")]
    pub default_limit: u64,

    /// Requested limits above this are capped
    #[serde(default = "default_max_limit")]
    pub max_limit: u64,
}

fn default_limit() -> u64 {
    20
}

fn default_max_limit() -> u64 {
    100
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}

impl PaginationConfig {
    /// Effective limit for a request
    pub fn resolve(&self, requested: Option<u64>) -> u64 {
        requested.unwrap_or(self.default_limit).min(self.max_limit)
    }
}

impl SchoolConfig {
    /// Load and validate configuration from a file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let config: SchoolConfig =
            serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                field: "data_dir",
                reason: "must not be empty".to_string(),
            });
        }

        self.hashing.validate().map_err(|e| ConfigError::Invalid {
            field: "hashing",
            reason: e.to_string(),
        })?;

        if self.password_policy.min_length == 0 {
            return Err(ConfigError::Invalid {
                field: "password_policy.min_length",
                reason: "must be > 0".to_string(),
            });
        }

        if self.pagination.default_limit == 0 || self.pagination.max_limit == 0 {
            return Err(ConfigError::Invalid {
                field: "pagination",
                reason: "limits must be > 0".to_string(),
            });
        }
        if self.pagination.default_limit > self.pagination.max_limit {
            return Err(ConfigError::Invalid {
                field: "pagination.default_limit",
                reason: format!(
                    "{} exceeds max_limit {}",
                    self.pagination.default_limit, self.pagination.max_limit
                ),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config = SchoolConfig::from_json("{}").unwrap();
        assert_eq!(config, SchoolConfig::default());
        assert_eq!(config.pagination.default_limit, 20);
        assert_eq!(config.password_policy.min_length, 8);
    }

    #[test]
    fn test_partial_sections() {
        let config = SchoolConfig::from_json(
            r#"{ "log_level": "warn", "pagination": { "max_limit": 50 } }"#,
        )
        .unwrap();
        assert_eq!(config.log_level, Severity::Warn);
        assert_eq!(config.pagination.default_limit, 20);
        assert_eq!(config.pagination.max_limit, 50);
    }

    #[test]
    fn test_rejects_inverted_limits() {
        let err = SchoolConfig::from_json(
            r#"{ "pagination": { "default_limit": 200, "max_limit": 100 } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "pagination.default_limit", .. }));
    }

    #[test]
    fn test_rejects_bad_hashing_params() {
        let err = SchoolConfig::from_json(r#"{ "hashing": { "iterations": 0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "hashing", .. }));
    }

    #[test]
    fn test_resolve_limit() {
        let p = PaginationConfig::default();
        assert_eq!(p.resolve(None), 20);
        assert_eq!(p.resolve(Some(5)), 5);
        assert_eq!(p.resolve(Some(1000)), 100);
    }

    #[test]
    fn test_load_missing_file() {
        let err = SchoolConfig::load(Path::new("/nonexistent/schooldesk.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
