//! Error types for scene operations.

use thiserror::Error;

/// Result type for scene operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in scene operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Element not found in scene.
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// A patch named a key that is neither a geometry, content nor style key.
    #[error("Unknown patch key: {0}")]
    UnknownPatchKey(String),

    /// A patch value had the wrong shape for its key.
    #[error("Invalid value for patch key {key}: {reason}")]
    InvalidPatchValue {
        /// The offending key.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// Invalid element operation.
    #[error("Invalid operation on element: {0}")]
    InvalidOperation(String),

    /// Scene serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
