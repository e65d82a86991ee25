//! Backend configuration.
//!
//! Configuration is loaded from environment variables with defaults that
//! match a stock deployment.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the only backend this crate provides.
pub const DEFAULT_BACKEND: &str = "default";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Error message.
        message: String,
    },
}

/// Permission resolution configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RbacConfig {
    /// Name of the RBAC backend to use.
    pub backend: String,

    /// Whether assignments synced from remote group mappings count.
    pub include_remote_assignments: bool,
}

impl Default for RbacConfig {
    fn default() -> Self {
        Self {
            backend: DEFAULT_BACKEND.to_string(),
            include_remote_assignments: true,
        }
    }
}

impl RbacConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `RBAC_BACKEND`: backend name (default: default)
    /// - `RBAC_INCLUDE_REMOTE_ASSIGNMENTS`: count remote assignments (default: true)
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            backend: std::env::var("RBAC_BACKEND").unwrap_or(default.backend),
            include_remote_assignments: std::env::var("RBAC_INCLUDE_REMOTE_ASSIGNMENTS")
                .map(|s| s != "false" && s != "0")
                .unwrap_or(default.include_remote_assignments),
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend != DEFAULT_BACKEND {
            return Err(ConfigError::InvalidValue {
                key: "backend".to_string(),
                message: format!("unknown backend {:?}, expected {:?}", self.backend, DEFAULT_BACKEND),
            });
        }
        Ok(())
    }
}
