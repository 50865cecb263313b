//! Error types for the generative-service adapter.

use adforge_core::Slot;
use thiserror::Error;

/// Result type for adapter operations.
pub type GenAiResult<T> = Result<T, GenAiError>;

/// Failure of a single backend call.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Connection, timeout or body read failure.
    #[error("generative service HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("generative service returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated.
        body: String,
    },

    /// The response envelope did not have the expected structure.
    #[error("unexpected generative service response: {0}")]
    UnexpectedResponse(String),
}

/// Errors surfaced to callers of the adapter.
#[derive(Debug, Error)]
pub enum GenAiError {
    /// The plan response did not parse as the expected structured shape.
    #[error("invalid plan response: {0}")]
    InvalidResponse(String),

    /// Both the primary and the fallback image attempts failed.
    #[error("image generation failed: {0}")]
    GenerationFailed(String),

    /// The single edit attempt produced no image.
    #[error("image edit failed: {0}")]
    EditFailed(String),

    /// A request for this slot is already in flight.
    #[error("a generation request for {0} is already pending")]
    SlotBusy(Slot),

    /// A plan request reached the service but did not complete.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// The adapter is misconfigured.
    #[error("invalid generative service configuration: {0}")]
    Config(String),
}

impl GenAiError {
    /// Whether re-issuing the same request can succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Config(_) | Self::SlotBusy(_))
    }
}
