//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Malformed input that passed deserialization
    #[error("Validation error: {0}")]
    Validation(String),

    /// The generation service failed
    #[error("Generation error: {0}")]
    Generation(String),

    /// File or metadata operation failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Unique constraint violated, usually by a concurrent identical request
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if this error is retryable
    ///
    /// A conflict means another request already stored the same entry, so
    /// repeating the request will hit the cache.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApplicationError::Conflict(_))
    }
}
