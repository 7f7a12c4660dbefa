//! Shared error mapping for the SQLite persistence layer

use application::error::ApplicationError;
use rusqlite::ErrorCode;

/// Map a rusqlite error to an application-layer error
///
/// Unique constraint violations become `Conflict`, everything else is a
/// storage failure.
pub fn map_sqlite_error(e: rusqlite::Error) -> ApplicationError {
    match e {
        rusqlite::Error::SqliteFailure(err, message)
            if err.code == ErrorCode::ConstraintViolation =>
        {
            ApplicationError::Conflict(
                message.unwrap_or_else(|| "unique constraint violated".to_string()),
            )
        },
        other => ApplicationError::Storage(format!("Database error: {other}")),
    }
}

/// Map a connection pool error to an application-layer error
pub fn map_pool_error(e: r2d2::Error) -> ApplicationError {
    ApplicationError::Storage(format!("Connection pool error: {e}"))
}

/// Map a blocking task join error to an application-layer error
pub fn map_join_error(e: tokio::task::JoinError) -> ApplicationError {
    ApplicationError::Internal(format!("Database task failed: {e}"))
}
