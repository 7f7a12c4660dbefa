//! Simulation service - Cache lookup, generation on miss, and administration

use std::{fmt, sync::Arc};

use domain::{
    CacheKey, DomainError, NewSimulation, SearchField, SimulationDescriptor, SimulationEntry,
    SimulationStatistics,
};
use tracing::{debug, error, info, instrument, warn};

use crate::{
    error::ApplicationError,
    ports::{
        ContentStorePort, InferencePort, PageRequest, SimulationFilter, SimulationStorePort,
    },
    services::generation_service::SimulationGenerator,
};

/// A cache entry together with its content
#[derive(Debug, Clone)]
pub struct CachedSimulation {
    pub entry: SimulationEntry,
    pub content: String,
}

/// Outcome of looking up a cache key
#[derive(Debug, Clone)]
pub enum CacheLookup {
    /// Metadata and content are both present
    Hit(CachedSimulation),
    /// Metadata is present but the content is gone
    Stale(SimulationEntry),
    /// Nothing is cached for this key
    Miss,
}

/// Result of a generate request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// Served from the cache
    Cached { cache_key: CacheKey, content: String },
    /// Freshly generated and stored
    Generated { cache_key: CacheKey, content: String },
}

impl GenerateOutcome {
    pub const fn cache_key(&self) -> &CacheKey {
        match self {
            Self::Cached { cache_key, .. } | Self::Generated { cache_key, .. } => cache_key,
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Self::Cached { content, .. } | Self::Generated { content, .. } => content,
        }
    }

    pub fn into_content(self) -> String {
        match self {
            Self::Cached { content, .. } | Self::Generated { content, .. } => content,
        }
    }

    pub const fn is_cached(&self) -> bool {
        matches!(self, Self::Cached { .. })
    }
}

/// One page of listed entries plus the unpaged total
#[derive(Debug, Clone)]
pub struct SimulationPage {
    pub total: u64,
    pub entries: Vec<SimulationEntry>,
}

/// What a cache clear removed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClearReport {
    pub deleted_records: u64,
    pub deleted_files: u64,
}

/// Orchestrates the cache: metadata store, content store, and generator
pub struct SimulationService {
    store: Arc<dyn SimulationStorePort>,
    content: Arc<dyn ContentStorePort>,
    generator: SimulationGenerator,
}

impl fmt::Debug for SimulationService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulationService")
            .field("generator", &self.generator)
            .finish_non_exhaustive()
    }
}

impl SimulationService {
    /// Create a new simulation service
    pub fn new(
        store: Arc<dyn SimulationStorePort>,
        content: Arc<dyn ContentStorePort>,
        inference: Arc<dyn InferencePort>,
    ) -> Self {
        Self {
            store,
            content,
            generator: SimulationGenerator::new(inference),
        }
    }

    /// Look up a key, counting the access on a metadata hit
    #[instrument(skip(self), fields(cache_key = %key))]
    pub async fn lookup(&self, key: &CacheKey) -> Result<CacheLookup, ApplicationError> {
        let Some(entry) = self.store.get_by_key(key).await? else {
            debug!("Cache miss");
            return Ok(CacheLookup::Miss);
        };

        match self.content.read(key).await? {
            Some(content) => {
                debug!(access_count = entry.access_count, "Cache hit");
                Ok(CacheLookup::Hit(CachedSimulation { entry, content }))
            },
            None => {
                warn!(file_path = %entry.file_path, "Cache entry has no content");
                Ok(CacheLookup::Stale(entry))
            },
        }
    }

    /// Return the cached document for a descriptor, generating it on a miss
    #[instrument(skip(self, descriptor), fields(topic = %descriptor.topic, level = descriptor.level()))]
    pub async fn generate(
        &self,
        descriptor: &SimulationDescriptor,
    ) -> Result<GenerateOutcome, ApplicationError> {
        let cache_key = descriptor.cache_key();
        debug!(%cache_key, "Derived cache key");

        self.generate_for_key(cache_key.clone(), descriptor)
            .await
            .inspect_err(|e| log_failure("generate", &cache_key, &descriptor.topic, e))
    }

    async fn generate_for_key(
        &self,
        cache_key: CacheKey,
        descriptor: &SimulationDescriptor,
    ) -> Result<GenerateOutcome, ApplicationError> {
        let stale = match self.lookup(&cache_key).await? {
            CacheLookup::Hit(cached) => {
                info!(%cache_key, "Serving cached simulation");
                return Ok(GenerateOutcome::Cached {
                    cache_key,
                    content: cached.content,
                });
            },
            CacheLookup::Stale(entry) => Some(entry),
            CacheLookup::Miss => None,
        };

        info!(%cache_key, restoring = stale.is_some(), "Generating new simulation");
        let content = self.generator.generate(descriptor).await?;
        let file_path = self.content.write(&cache_key, &content).await?;

        if let Some(entry) = stale {
            if entry.file_path != file_path
                && !self.store.update_file_path(&cache_key, &file_path).await?
            {
                warn!(%cache_key, "Entry vanished while its content was restored");
            }
            info!(%cache_key, %file_path, "Restored content for existing entry");
        } else {
            let row_id = self
                .store
                .insert(&NewSimulation::generated(descriptor.clone(), file_path))
                .await?;
            info!(%cache_key, row_id, "Stored new simulation");
        }

        Ok(GenerateOutcome::Generated { cache_key, content })
    }

    /// Fetch a cached document by key
    ///
    /// A stale entry is reported as not found.
    #[instrument(skip(self), fields(cache_key = %key))]
    pub async fn get_content(&self, key: &CacheKey) -> Result<String, ApplicationError> {
        match self.lookup(key).await {
            Ok(CacheLookup::Hit(cached)) => Ok(cached.content),
            Ok(CacheLookup::Stale(_) | CacheLookup::Miss) => {
                Err(DomainError::not_found("Simulation", key.as_str()).into())
            },
            Err(e) => {
                log_failure("get", key, "", &e);
                Err(e)
            },
        }
    }

    /// Delete one entry and its content
    #[instrument(skip(self), fields(cache_key = %key))]
    pub async fn delete(&self, key: &CacheKey) -> Result<(), ApplicationError> {
        self.delete_entry(key)
            .await
            .inspect_err(|e| log_failure("delete", key, "", e))
    }

    async fn delete_entry(&self, key: &CacheKey) -> Result<(), ApplicationError> {
        if !self.store.contains(key).await? {
            return Err(DomainError::not_found("Simulation", key.as_str()).into());
        }

        if !self.content.delete(key).await? {
            warn!(cache_key = %key, "Content was already missing");
        }

        if !self.store.delete_by_key(key).await? {
            return Err(ApplicationError::Storage(format!(
                "failed to delete metadata for {key}"
            )));
        }

        info!(cache_key = %key, "Simulation deleted");
        Ok(())
    }

    /// Delete every entry and its content
    ///
    /// Content removal failures are logged and skipped; metadata is always
    /// cleared afterwards.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<ClearReport, ApplicationError> {
        let entries = self.store.list(SimulationFilter::any(), PageRequest::all()).await?;

        let mut deleted_files = 0;
        for entry in &entries {
            match self.content.delete(&entry.cache_key).await {
                Ok(true) => deleted_files += 1,
                Ok(false) => debug!(cache_key = %entry.cache_key, "No content to delete"),
                Err(e) => log_failure("clear", &entry.cache_key, &entry.topic, &e),
            }
        }

        let deleted_records = self.store.delete_all().await.inspect_err(|e| {
            error!(error = %e, "Failed to clear simulation metadata");
        })?;

        info!(deleted_records, deleted_files, "Cache cleared");
        Ok(ClearReport {
            deleted_records,
            deleted_files,
        })
    }

    /// List entries newest first, with the total matching the filter
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        filter: SimulationFilter,
        page: PageRequest,
    ) -> Result<SimulationPage, ApplicationError> {
        let total = self.store.count(filter).await?;
        let entries = self.store.list(filter, page).await?;
        Ok(SimulationPage { total, entries })
    }

    /// Substring search over the given fields
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        term: &str,
        fields: &[SearchField],
    ) -> Result<Vec<SimulationEntry>, ApplicationError> {
        if term.is_empty() {
            return Err(ApplicationError::Validation(
                "search term must not be empty".to_string(),
            ));
        }
        let all = SearchField::ALL;
        let fields = if fields.is_empty() { &all[..] } else { fields };
        self.store.search(term, fields).await
    }

    /// Entries of one subject and level in curriculum order
    #[instrument(skip(self))]
    pub async fn curriculum(
        &self,
        subject_id: i64,
        level: i64,
    ) -> Result<Vec<SimulationEntry>, ApplicationError> {
        self.store.list_by_subject_and_level(subject_id, level).await
    }

    /// Aggregate cache statistics
    #[instrument(skip(self))]
    pub async fn statistics(&self) -> Result<SimulationStatistics, ApplicationError> {
        self.store.statistics().await
    }

    /// Check that metadata storage is usable
    pub async fn is_storage_healthy(&self) -> bool {
        self.store.is_healthy().await
    }

    /// Check that the generation backend is reachable
    pub async fn is_generation_healthy(&self) -> bool {
        self.generator.is_healthy().await
    }

    /// Name of the generation model
    pub fn model(&self) -> String {
        self.generator.model()
    }
}

fn log_failure(operation: &str, cache_key: &CacheKey, topic: &str, err: &ApplicationError) {
    match err {
        ApplicationError::Domain(DomainError::NotFound { .. }) => {
            debug!(operation, %cache_key, topic, error = %err, "Simulation not found");
        },
        _ => error!(operation, %cache_key, topic, error = %err, "Simulation operation failed"),
    }
}
