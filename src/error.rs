//! Error types for revise
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in the revision scheduler
#[derive(Debug, Error)]
pub enum RevisionError {
    /// No problem with the given id is tracked
    #[error("Problem not found: {0}")]
    NotFound(String),

    /// Inbound event or imported data failed validation
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Storage/persistence error
    #[error("Storage error: {0}")]
    Storage(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for revision operations
pub type Result<T> = std::result::Result<T, RevisionError>;
