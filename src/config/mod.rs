//! Configuration loading and management

use crate::core::error::ConfigError;
use crate::core::pagination::PaginationConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Complete service configuration
///
/// Every field has a default, so an empty YAML document is a valid config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Address the HTTP server binds to
    pub bind_address: String,

    /// PostgreSQL connection string; the in-memory store is used when absent
    pub database_url: Option<String>,

    /// Default and maximum page sizes for list requests
    pub pagination: PaginationConfig,

    /// Upper bound on any single store round-trip
    pub store_timeout_ms: u64,

    /// Maximum accepted request body size
    pub max_body_bytes: usize,

    /// Fallback log filter when `RUST_LOG` is not set
    pub log_filter: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            database_url: None,
            pagination: PaginationConfig::default(),
            store_timeout_ms: 5_000,
            max_body_bytes: 1024 * 1024,
            log_filter: "info".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content).map_err(|e| match e {
            ConfigError::ParseError { message, .. } => ConfigError::ParseError {
                file: Some(path.to_string()),
                message,
            },
            other => other,
        })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    /// Reject inconsistent settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        let pagination = &self.pagination;
        if pagination.default_limit > pagination.max_limit {
            return Err(ConfigError::InvalidValue {
                field: "pagination.default_limit".to_string(),
                value: pagination.default_limit.to_string(),
                message: format!("must not exceed max_limit ({})", pagination.max_limit),
            });
        }

        if self.store_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "store_timeout_ms".to_string(),
                value: "0".to_string(),
                message: "must be positive".to_string(),
            });
        }

        if self.max_body_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_body_bytes".to_string(),
                value: "0".to_string(),
                message: "must be positive".to_string(),
            });
        }

        Ok(())
    }
}
