//! Content store port
//!
//! Flat storage of generated documents, addressed by cache key.

use async_trait::async_trait;
use domain::CacheKey;

use crate::error::ApplicationError;

/// Port for reading and writing generated content
///
/// Absence is a normal outcome: `read` returns `Ok(None)` and `delete`
/// returns `Ok(false)`. Only genuine I/O failures are errors.
#[async_trait]
pub trait ContentStorePort: Send + Sync {
    /// Write content for `key`, replacing any previous content
    ///
    /// Returns the location the content was written to.
    async fn write(&self, key: &CacheKey, content: &str) -> Result<String, ApplicationError>;

    /// Read content for `key`
    async fn read(&self, key: &CacheKey) -> Result<Option<String>, ApplicationError>;

    /// Delete content for `key`, returning whether anything was removed
    async fn delete(&self, key: &CacheKey) -> Result<bool, ApplicationError>;
}
