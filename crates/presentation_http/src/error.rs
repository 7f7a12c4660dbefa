//! API error handling
//!
//! Maps application errors onto HTTP statuses with a JSON body. Outside
//! development, storage and internal failures return generic messages
//! without details.

use std::sync::atomic::{AtomicBool, Ordering};

use application::ApplicationError;
use axum::{
    Json,
    http::{HeaderValue, StatusCode, header::RETRY_AFTER},
    response::{IntoResponse, Response},
};
use domain::DomainError;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Seconds a client should wait before retrying a conflicting request
pub const RETRY_AFTER_SECS: u64 = 1;

const GENERIC_MESSAGE: &str = "An error occurred processing your request";

static EXPOSE_INTERNAL_ERRORS: AtomicBool = AtomicBool::new(true);

/// Configure whether internal error details are included in responses
///
/// Production deployments set this to `false`.
pub fn set_expose_internal_errors(expose: bool) {
    EXPOSE_INTERNAL_ERRORS.store(expose, Ordering::SeqCst);
}

fn should_expose_details() -> bool {
    EXPOSE_INTERNAL_ERRORS.load(Ordering::SeqCst)
}

/// Replace messages that look like they carry paths or connection details
fn sanitize_error_message(msg: &str, expose: bool) -> String {
    if expose {
        return msg.to_string();
    }

    let sensitive_patterns = [
        "/home/",
        "/Users/",
        "/var/",
        "/etc/",
        "\\Users\\",
        "C:\\",
        "sqlite",
        "panicked at",
        ".rs:",
        "connection refused",
    ];

    let msg_lower = msg.to_lowercase();
    if sensitive_patterns
        .iter()
        .any(|pattern| msg_lower.contains(&pattern.to_lowercase()))
        || msg.contains("://")
    {
        return GENERIC_MESSAGE.to_string();
    }

    msg.to_string()
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// HTTP status for this error
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Conflict(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Generation(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self, expose: bool) -> ErrorResponse {
        let (code, error, details) = match self {
            Self::NotFound(msg) => ("not_found", sanitize_error_message(msg, expose), None),
            Self::UnprocessableEntity(msg) => {
                ("validation_error", sanitize_error_message(msg, expose), None)
            },
            // Generation failures always reach the client verbatim
            Self::Generation(msg) => ("generation_failed", msg.clone(), None),
            Self::Conflict(msg) => (
                "conflict",
                "Simulation is being stored by another request, retry shortly".to_string(),
                expose.then(|| msg.clone()),
            ),
            Self::Internal(msg) => (
                "internal_error",
                "An internal error occurred".to_string(),
                expose.then(|| msg.clone()),
            ),
        };

        ErrorResponse {
            error,
            code: code.to_string(),
            details,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = self.body(should_expose_details());
        let mut response = (status, Json(body)).into_response();

        if matches!(self, Self::Conflict(_)) {
            response
                .headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(RETRY_AFTER_SECS));
        }

        response
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        match err {
            ApplicationError::Domain(e @ DomainError::NotFound { .. }) => {
                Self::NotFound(e.to_string())
            },
            ApplicationError::Domain(e) => Self::UnprocessableEntity(e.to_string()),
            ApplicationError::Validation(msg) => Self::UnprocessableEntity(msg),
            ApplicationError::Generation(msg) => Self::Generation(msg),
            ApplicationError::Conflict(msg) => Self::Conflict(msg),
            ApplicationError::Storage(msg)
            | ApplicationError::Configuration(msg)
            | ApplicationError::Internal(msg) => Self::Internal(msg),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApplicationError::from(err).into()
    }
}
