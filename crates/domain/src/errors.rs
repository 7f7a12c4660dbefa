//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Cache key is not a 32 character hex digest
    #[error("Invalid cache key: {0}")]
    InvalidCacheKey(String),

    /// Identifier could not be coerced to an integer
    #[error("Invalid identifier for {field}: {value}")]
    InvalidIdentifier { field: String, value: String },

    /// Unknown search field name
    #[error("Invalid search field: {0}")]
    InvalidSearchField(String),

    /// Entity not found
    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: String, id: String },
}

impl DomainError {
    /// Create a not found error
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    /// Create an invalid identifier error
    pub fn invalid_identifier(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            field: field.into(),
            value: value.into(),
        }
    }
}
