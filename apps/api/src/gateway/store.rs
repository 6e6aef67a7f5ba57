//! Backing stores for the generation cache.
//!
//! The gateway hands a store a key, a value and a TTL; capacity and eviction are
//! the store's business. Errors surface as `CoreError::CacheUnavailable` and the
//! gateway degrades to calling the backend directly.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use redis::aio::MultiplexedConnection;
use tracing::debug;

use crate::errors::CoreError;
use crate::gateway::CachedGeneration;

#[async_trait]
pub trait GenerationStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<CachedGeneration>, CoreError>;

    async fn put(&self, entry: &CachedGeneration, ttl: Duration) -> Result<(), CoreError>;

    fn name(&self) -> &'static str;
}

/// In-process store. Expired entries are evicted lazily on lookup.
#[derive(Debug, Default)]
pub struct InMemoryGenerationStore {
    entries: Mutex<HashMap<String, CachedGeneration>>,
}

impl InMemoryGenerationStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

#[async_trait]
impl GenerationStore for InMemoryGenerationStore {
    async fn get(&self, key: &str) -> Result<Option<CachedGeneration>, CoreError> {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        match entries.get(key) {
            Some(entry) if entry.is_expired(Utc::now()) => {
                debug!(key, "evicting expired generation");
                entries.remove(key);
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.clone())),
            None => Ok(None),
        }
    }

    // The entry already carries its expiry; the TTL is implied by it.
    async fn put(&self, entry: &CachedGeneration, _ttl: Duration) -> Result<(), CoreError> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(entry.cache_key.clone(), entry.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

/// Redis-backed store: `SET key <json> EX ttl` / `GET key`. Redis owns eviction.
#[derive(Clone)]
pub struct RedisGenerationStore {
    connection: MultiplexedConnection,
}

impl RedisGenerationStore {
    pub async fn connect(client: &redis::Client) -> Result<Self, CoreError> {
        let connection = client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(|e| CoreError::CacheUnavailable(format!("redis connect failed: {e}")))?;
        Ok(Self { connection })
    }
}

#[async_trait]
impl GenerationStore for RedisGenerationStore {
    async fn get(&self, key: &str) -> Result<Option<CachedGeneration>, CoreError> {
        let mut connection = self.connection.clone();
        let payload: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut connection)
            .await
            .map_err(|e| CoreError::CacheUnavailable(format!("redis GET failed: {e}")))?;

        match payload {
            Some(json) => serde_json::from_str(&json).map(Some).map_err(|e| {
                CoreError::CacheUnavailable(format!("corrupt cache entry under {key}: {e}"))
            }),
            None => Ok(None),
        }
    }

    async fn put(&self, entry: &CachedGeneration, ttl: Duration) -> Result<(), CoreError> {
        let payload = serde_json::to_string(entry)
            .map_err(|e| CoreError::CacheUnavailable(format!("cannot encode entry: {e}")))?;
        let mut connection = self.connection.clone();
        redis::cmd("SET")
            .arg(&entry.cache_key)
            .arg(payload)
            .arg("EX")
            .arg(ttl.as_secs().max(1))
            .query_async::<_, ()>(&mut connection)
            .await
            .map_err(|e| CoreError::CacheUnavailable(format!("redis SET failed: {e}")))
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}
