//! Flat-file content store
//!
//! Each document lives at `<directory>/<cache_key>.html`. Cache keys are
//! validated hex strings, so they are safe to use as file names.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use application::{error::ApplicationError, ports::ContentStorePort};
use async_trait::async_trait;
use domain::CacheKey;
use tokio::fs;
use tracing::{debug, instrument};

use crate::config::ContentConfig;

const FILE_EXTENSION: &str = "html";

/// Content store backed by a directory of HTML files
#[derive(Debug, Clone)]
pub struct FileContentStore {
    directory: PathBuf,
}

impl FileContentStore {
    /// Create a store rooted at `directory` without touching the filesystem
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Create the store and its directory
    pub async fn open(config: &ContentConfig) -> Result<Self, ApplicationError> {
        let store = Self::new(&config.directory);
        fs::create_dir_all(&store.directory).await.map_err(|e| {
            ApplicationError::Storage(format!(
                "Failed to create content directory {}: {e}",
                store.directory.display()
            ))
        })?;
        Ok(store)
    }

    /// Root directory of the store
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.directory
            .join(format!("{}.{FILE_EXTENSION}", key.as_str()))
    }
}

fn io_error(action: &str, path: &Path, e: &std::io::Error) -> ApplicationError {
    ApplicationError::Storage(format!("Failed to {action} {}: {e}", path.display()))
}

#[async_trait]
impl ContentStorePort for FileContentStore {
    #[instrument(skip(self, content), fields(cache_key = %key, content_len = content.len()))]
    async fn write(&self, key: &CacheKey, content: &str) -> Result<String, ApplicationError> {
        let path = self.path_for(key);
        fs::write(&path, content)
            .await
            .map_err(|e| io_error("write", &path, &e))?;

        debug!(path = %path.display(), "Wrote content");
        Ok(path.to_string_lossy().into_owned())
    }

    #[instrument(skip(self), fields(cache_key = %key))]
    async fn read(&self, key: &CacheKey) -> Result<Option<String>, ApplicationError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error("read", &path, &e)),
        }
    }

    #[instrument(skip(self), fields(cache_key = %key))]
    async fn delete(&self, key: &CacheKey) -> Result<bool, ApplicationError> {
        let path = self.path_for(key);
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(path = %path.display(), "Deleted content");
                Ok(true)
            },
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(io_error("delete", &path, &e)),
        }
    }
}
