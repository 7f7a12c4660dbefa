//! Inference errors

use thiserror::Error;

/// Errors that can occur during inference
#[derive(Debug, Error)]
pub enum InferenceError {
    /// No API key configured
    #[error("API key is not configured")]
    MissingApiKey,

    /// Failed to connect to the generation API
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request could not be sent or completed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Model not found or not accessible
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Response could not be parsed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The response carried no usable text
    #[error("Empty response: {0}")]
    EmptyResponse(String),

    /// Timeout during inference
    #[error("Inference request timed out")]
    Timeout,

    /// Rate limit or quota exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// API returned an error
    #[error("Server error: {0}")]
    ServerError(String),
}

impl From<reqwest::Error> for InferenceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            InferenceError::Timeout
        } else if err.is_connect() {
            InferenceError::ConnectionFailed(err.to_string())
        } else {
            InferenceError::RequestFailed(err.to_string())
        }
    }
}
