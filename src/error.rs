//! Error types for the shear pruning engine.

use thiserror::Error;

/// Errors raised while pruning a tree
#[derive(Debug, Error)]
pub enum PruneError {
    #[error("Path resolution failed for {path}: {reason}")]
    PathResolution { path: String, reason: String },

    #[error("Unexpected node at {path}: expected {expected}, found {found}")]
    UnexpectedNode {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Pruning cancelled at {path}")]
    Cancelled { path: String },
}

impl PruneError {
    pub(crate) fn resolution(path: &str, reason: impl Into<String>) -> Self {
        PruneError::PathResolution {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}

/// Schema index construction errors
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Duplicate schema path: {0}")]
    DuplicatePath(String),

    #[error("Invalid schema path: {0}")]
    InvalidPath(String),

    #[error("Unsupported schema file format: {0}")]
    UnsupportedFormat(String),

    #[error("Schema parse error: {0}")]
    Parse(String),

    #[error("Schema I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while materializing a tree from a JSON payload
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("Type mismatch at {path}: expected {expected}")]
    TypeMismatch { path: String, expected: &'static str },

    #[error("List element at {path} is missing key leaf '{key}'")]
    MissingKey { path: String, key: String },

    #[error("Invalid root member: {0}")]
    InvalidRoot(String),
}

/// Facade-level errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Prune error: {0}")]
    Prune(#[from] PruneError),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Tree error: {0}")]
    Tree(#[from] TreeError),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
