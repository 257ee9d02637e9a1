//! File-backed record store
//!
//! Stores the history record as a JSON file with an expiry timestamp in an
//! XDG-compliant cache directory (`~/.cache/fngproxy/` on Linux). Intended
//! for local development and tests; deployments use [`super::RedisStore`].

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

use super::RecordStore;
use crate::error::ProxyError;
use crate::history::HistoryRecord;

/// Wrapper struct for entries stored on disk
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    /// The cached record
    record: HistoryRecord,
    /// When the record was cached
    cached_at: DateTime<Utc>,
    /// When the entry expires
    expires_at: DateTime<Utc>,
}

/// Record store backed by one JSON file per key
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Directory where entries are stored
    cache_dir: PathBuf,
}

impl FileStore {
    /// Creates a store in the XDG-compliant cache directory
    ///
    /// Returns `None` if the cache directory cannot be determined (e.g., no
    /// home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "fngproxy")?;
        let cache_dir = project_dirs.cache_dir().to_path_buf();
        Some(Self { cache_dir })
    }

    /// Creates a store rooted at a custom directory
    ///
    /// Useful for testing or when a specific location is needed.
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Returns the path of the entry file for the given key
    fn entry_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", key))
    }
}

#[async_trait]
impl RecordStore for FileStore {
    async fn read(&self, key: &str) -> Result<Option<HistoryRecord>, ProxyError> {
        let path = self.entry_path(key);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ProxyError::Store(e.to_string())),
        };

        // An unparsable entry is treated as absent; the next write replaces it.
        let entry: CacheEntry = match serde_json::from_str(&content) {
            Ok(entry) => entry,
            Err(e) => {
                debug!("discarding unparsable cache entry {key}: {e}");
                return Ok(None);
            }
        };

        if Utc::now() > entry.expires_at {
            debug!("cache entry {key} expired at {}", entry.expires_at);
            return Ok(None);
        }

        Ok(Some(entry.record))
    }

    async fn write(
        &self,
        key: &str,
        record: &HistoryRecord,
        ttl_secs: u64,
    ) -> Result<(), ProxyError> {
        fs::create_dir_all(&self.cache_dir)
            .await
            .map_err(|e| ProxyError::Store(e.to_string()))?;

        let now = Utc::now();
        let entry = CacheEntry {
            record: record.clone(),
            cached_at: now,
            expires_at: now + Duration::seconds(ttl_secs as i64),
        };

        let json =
            serde_json::to_string_pretty(&entry).map_err(|e| ProxyError::Store(e.to_string()))?;

        fs::write(self.entry_path(key), json)
            .await
            .map_err(|e| ProxyError::Store(e.to_string()))
    }
}
