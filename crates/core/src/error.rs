//! Error types for the core domain

use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Mapping references column '{0}' which is not present in the record")]
    ColumnMissing(String),

    #[error("Key column '{0}' has no usable value")]
    EmptyKey(String),

    #[error("Edge references unknown node: {0}")]
    UnknownNode(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
