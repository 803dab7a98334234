//! Error types for loading and writing generator files.
//!
//! Covers I/O, serialization, patch merge and resource graph validation
//! failures.

use clientgen_core::PatchError;
use thiserror::Error;

/// Errors that can occur while loading inputs or writing outputs.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The patch document could not be merged.
    #[error(transparent)]
    Patch(#[from] PatchError),

    /// The resource graph is structurally invalid.
    #[error("invalid API documentation: {0}")]
    InvalidApi(String),
}

/// Convenience alias for results with [`LoadError`].
pub type Result<T> = std::result::Result<T, LoadError>;
