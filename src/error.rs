//! Error types for ecsctl

use thiserror::Error;

/// Result type for ecsctl operations
pub type Result<T> = std::result::Result<T, EcsctlError>;

/// ecsctl error types
#[derive(Error, Debug)]
pub enum EcsctlError {
    #[error("Manifest decode error: {0}")]
    Decode(String),

    #[error("Invalid quantity: {0:?}")]
    InvalidQuantity(String),

    #[error("{0} not found in $PATH")]
    ExternalToolNotFound(String),

    #[error("External tool failed: {0}")]
    ExternalToolFailure(String),

    #[error("no resource(s) passed to apply")]
    EmptyInput,

    #[error("Compose file parse error: {0}")]
    ComposeParse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(String),
}
