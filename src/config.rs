//! Configuration System
//!
//! Layered configuration for services embedding the pruner: logging, where
//! the schema index is loaded from, and statistics behaviour. Sources merge
//! through the `config` crate; see [`ConfigLoader`] for precedence.

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShearConfig {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Schema index source
    #[serde(default)]
    pub schema: SchemaConfig,

    /// Pruning statistics
    #[serde(default)]
    pub stats: StatsConfig,
}

/// Schema index source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Schema document (`.json` or `.toml`)
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Record per-call timings
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log cumulative totals after every call
    #[serde(default = "default_true")]
    pub log_totals: bool,
}

fn default_true() -> bool {
    true
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_totals: true,
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Schema(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Schema(msg) => write!(f, "Schema: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl ShearConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Some(path) = &self.schema.path {
            if path.as_os_str().is_empty() {
                errors.push(ValidationError::Schema("Schema path cannot be empty".to_string()));
            }
        }

        if self.logging.format != "json" && self.logging.format != "text" {
            errors.push(ValidationError::Logging(format!(
                "Invalid log format '{}'",
                self.logging.format
            )));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
