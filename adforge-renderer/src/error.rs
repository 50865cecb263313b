//! Renderer error types.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur during rendering.
///
/// Failures of a single layer are not errors; they are reported through
/// [`crate::RenderReport::failures`].
#[derive(Debug, Error)]
pub enum RenderError {
    /// The raster surface could not be created.
    #[error("Surface error: {0}")]
    Surface(String),

    /// Resource loading failed.
    #[error("Failed to load resource: {0}")]
    Resource(String),

    /// Encoding the finished surface failed.
    #[error("Encoding failed: {0}")]
    Encode(String),
}
