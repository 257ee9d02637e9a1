//! Persistent record store with put-with-expiry semantics
//!
//! The proxy keeps its single history record in an external key-value store.
//! Implementations provide plain get/put semantics with a per-write expiry;
//! an entry past its expiry reads as absent. A Redis backend is used in
//! deployment and a file backend for local development and tests.

mod file;
mod redis;

pub use self::file::FileStore;
pub use self::redis::RedisStore;

use async_trait::async_trait;

use crate::error::ProxyError;
use crate::history::HistoryRecord;

/// Key-value storage for the cached history record
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Reads the record stored under `key`, if present and unexpired
    async fn read(&self, key: &str) -> Result<Option<HistoryRecord>, ProxyError>;

    /// Stores `record` under `key` with the given expiry in seconds
    async fn write(
        &self,
        key: &str,
        record: &HistoryRecord,
        ttl_secs: u64,
    ) -> Result<(), ProxyError>;
}
