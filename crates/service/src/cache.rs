//! Key/value cache abstraction with an in-process moka backend.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use configs::CacheConfig;
use moka::future::Cache;
use moka::Expiry;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type CacheResult<T> = Result<T, CacheError>;

/// String keys, byte values. A `None` ttl falls back to the backend default.
#[async_trait]
pub trait CacheService: Send + Sync {
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>>;

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> CacheResult<()>;

    /// Restart the expiration window of an entry without changing it.
    async fn refresh(&self, key: &str) -> CacheResult<()>;

    async fn remove(&self, key: &str) -> CacheResult<()>;
}

pub async fn get_json<T, C>(cache: &C, key: &str) -> CacheResult<Option<T>>
where
    T: DeserializeOwned,
    C: CacheService + ?Sized,
{
    match cache.get(key).await? {
        Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        None => Ok(None),
    }
}

pub async fn set_json<T, C>(cache: &C, key: &str, value: &T, ttl: Option<Duration>) -> CacheResult<()>
where
    T: Serialize + ?Sized,
    C: CacheService + ?Sized,
{
    let bytes = serde_json::to_vec(value)?;
    cache.set(key, bytes, ttl).await
}

#[derive(Clone)]
struct CachedValue {
    data: Arc<Vec<u8>>,
    ttl: Duration,
}

/// Each entry lives for its own ttl, counted from the last write.
struct PerEntryTtl;

impl Expiry<String, CachedValue> for PerEntryTtl {
    fn expire_after_create(&self, _key: &String, value: &CachedValue, _created_at: Instant) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CachedValue,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

#[derive(Clone)]
pub struct MemoryCacheService {
    inner: Cache<String, CachedValue>,
    default_ttl: Duration,
}

impl MemoryCacheService {
    pub fn new(config: &CacheConfig) -> Self {
        let inner = Cache::builder()
            .max_capacity(config.max_capacity)
            .expire_after(PerEntryTtl)
            .build();
        Self { inner, default_ttl: Duration::from_secs(config.ttl_secs) }
    }

    pub fn default_ttl(&self) -> Duration { self.default_ttl }
}

#[async_trait]
impl CacheService for MemoryCacheService {
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        Ok(self.inner.get(key).await.map(|v| v.data.as_ref().clone()))
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> CacheResult<()> {
        let ttl = ttl.unwrap_or(self.default_ttl);
        debug!(key, ttl_ms = ttl.as_millis() as u64, "cache set");
        self.inner.insert(key.to_string(), CachedValue { data: Arc::new(value), ttl }).await;
        Ok(())
    }

    async fn refresh(&self, key: &str) -> CacheResult<()> {
        if let Some(value) = self.inner.get(key).await {
            self.inner.insert(key.to_string(), value).await;
        }
        Ok(())
    }

    async fn remove(&self, key: &str) -> CacheResult<()> {
        self.inner.invalidate(key).await;
        Ok(())
    }
}
