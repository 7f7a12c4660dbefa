//! Simulation metadata store port

use async_trait::async_trait;
use domain::{CacheKey, NewSimulation, SearchField, SimulationEntry, SimulationStatistics};

use crate::error::ApplicationError;

/// Optional equality filters for listing and counting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulationFilter {
    pub level: Option<i64>,
    pub subject_id: Option<i64>,
}

impl SimulationFilter {
    /// Filter matching every entry
    pub const fn any() -> Self {
        Self {
            level: None,
            subject_id: None,
        }
    }

    /// Restrict to one level
    #[must_use]
    pub const fn with_level(mut self, level: i64) -> Self {
        self.level = Some(level);
        self
    }

    /// Restrict to one subject
    #[must_use]
    pub const fn with_subject_id(mut self, subject_id: i64) -> Self {
        self.subject_id = Some(subject_id);
        self
    }
}

/// Pagination window; no limit means every row after `offset`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: Option<u32>,
    pub offset: u32,
}

impl PageRequest {
    /// Every row
    pub const fn all() -> Self {
        Self {
            limit: None,
            offset: 0,
        }
    }

    /// A bounded page
    pub const fn new(limit: Option<u32>, offset: u32) -> Self {
        Self { limit, offset }
    }
}

/// Port for persisting simulation metadata
///
/// Every method is atomic on its own. There are no cross-call transactions.
#[async_trait]
pub trait SimulationStorePort: Send + Sync {
    /// Insert a new entry, returning its row id
    ///
    /// Fails with `ApplicationError::Conflict` if the cache key exists.
    async fn insert(&self, simulation: &NewSimulation) -> Result<i64, ApplicationError>;

    /// Fetch an entry, counting the read
    ///
    /// On a hit `access_count` is incremented and `accessed_at` refreshed in
    /// the same statement; the returned entry reflects the update.
    async fn get_by_key(&self, key: &CacheKey) -> Result<Option<SimulationEntry>, ApplicationError>;

    /// Check for an entry without touching access statistics
    async fn contains(&self, key: &CacheKey) -> Result<bool, ApplicationError>;

    /// List entries newest first
    async fn list(
        &self,
        filter: SimulationFilter,
        page: PageRequest,
    ) -> Result<Vec<SimulationEntry>, ApplicationError>;

    /// Count entries matching `filter`
    async fn count(&self, filter: SimulationFilter) -> Result<u64, ApplicationError>;

    /// Case-sensitive substring search over `fields`, newest first
    ///
    /// An empty `fields` slice searches all fields.
    async fn search(
        &self,
        term: &str,
        fields: &[SearchField],
    ) -> Result<Vec<SimulationEntry>, ApplicationError>;

    /// Entries of one subject and level, in chapter then topic order
    async fn list_by_subject_and_level(
        &self,
        subject_id: i64,
        level: i64,
    ) -> Result<Vec<SimulationEntry>, ApplicationError>;

    /// Point an existing entry at a new content location
    ///
    /// Returns whether a row was updated.
    async fn update_file_path(
        &self,
        key: &CacheKey,
        file_path: &str,
    ) -> Result<bool, ApplicationError>;

    /// Delete one entry, returning whether it existed
    async fn delete_by_key(&self, key: &CacheKey) -> Result<bool, ApplicationError>;

    /// Delete every entry, returning how many were removed
    async fn delete_all(&self) -> Result<u64, ApplicationError>;

    /// Aggregate statistics over all entries
    async fn statistics(&self) -> Result<SimulationStatistics, ApplicationError>;

    /// Check that the store can serve queries
    async fn is_healthy(&self) -> bool;
}
