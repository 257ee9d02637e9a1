//! Redis-backed record store
//!
//! Uses a `ConnectionManager` for automatic reconnection. Records are stored
//! as JSON strings written with `SETEX`, so the server itself expires stale
//! keys after the retention window.

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands};
use tracing::debug;

use super::RecordStore;
use crate::error::ProxyError;
use crate::history::HistoryRecord;

/// Record store backed by a Redis server
#[derive(Clone)]
pub struct RedisStore {
    conn_manager: ConnectionManager,
}

impl RedisStore {
    /// Connects to the Redis server at `redis_url`
    pub async fn connect(redis_url: &str) -> Result<Self, ProxyError> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| ProxyError::Store(format!("invalid redis URL: {e}")))?;
        let conn_manager = ConnectionManager::new(client)
            .await
            .map_err(|e| ProxyError::Store(format!("redis connection failed: {e}")))?;
        Ok(Self { conn_manager })
    }
}

#[async_trait]
impl RecordStore for RedisStore {
    async fn read(&self, key: &str) -> Result<Option<HistoryRecord>, ProxyError> {
        let mut conn = self.conn_manager.clone();
        let raw: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| ProxyError::Store(format!("redis GET {key}: {e}")))?;

        match raw {
            Some(raw) => {
                debug!("cache hit for key {key}");
                let record = serde_json::from_str(&raw)
                    .map_err(|e| ProxyError::Store(format!("corrupt cache entry {key}: {e}")))?;
                Ok(Some(record))
            }
            None => {
                debug!("cache miss for key {key}");
                Ok(None)
            }
        }
    }

    async fn write(
        &self,
        key: &str,
        record: &HistoryRecord,
        ttl_secs: u64,
    ) -> Result<(), ProxyError> {
        let raw = serde_json::to_string(record).map_err(|e| ProxyError::Store(e.to_string()))?;

        let mut conn = self.conn_manager.clone();
        conn.set_ex::<_, _, ()>(key, raw, ttl_secs)
            .await
            .map_err(|e| ProxyError::Store(format!("redis SETEX {key}: {e}")))?;

        debug!("cache write for key {key} with TTL {ttl_secs}s");
        Ok(())
    }
}
