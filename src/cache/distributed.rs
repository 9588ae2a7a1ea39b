//! Distributed Cache Tier
//!
//! Shared key/value store consulted after the local tier. The backend owns
//! TTL enforcement (Redis `SETEX`). Every operation returns a typed
//! `Result<_, TierError>` so the access layer can decide how to degrade.

use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use deadpool_redis::{Pool, Runtime};
use redis::AsyncCommands;
use thiserror::Error;
use tracing::debug;

use crate::cache::CacheEntry;

// == Tier Error ==
/// Failure of a cache tier. Never surfaced to callers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TierError {
    /// Backend not configured, not connected, or not ready
    #[error("tier unavailable: {0}")]
    Unavailable(String),

    /// Call exceeded its deadline
    #[error("tier call timed out after {0:?}")]
    Timeout(Duration),

    /// Stored payload could not be decoded
    #[error("malformed payload: {0}")]
    Malformed(String),

    /// Backend rejected the command
    #[error("backend error: {0}")]
    Backend(String),
}

// == Distributed Tier Trait ==
/// Contract for the shared cache backend.
///
/// Values are serialized payloads; decoding is the caller's concern.
#[async_trait]
pub trait DistributedTier: Send + Sync {
    /// Returns the stored payload, `Ok(None)` when the key is absent.
    async fn get(&self, key: &str) -> Result<Option<String>, TierError>;

    /// Stores `value` under `key`, expiring after `ttl_secs` seconds.
    async fn set_with_expiry(&self, key: &str, value: &str, ttl_secs: u64)
        -> Result<(), TierError>;

    /// Short backend name used in log fields.
    fn name(&self) -> &'static str;
}

// == Redis Tier ==
/// Redis-backed tier over a `deadpool-redis` connection pool.
#[derive(Clone)]
pub struct RedisTier {
    pool: Pool,
}

impl RedisTier {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DistributedTier for RedisTier {
    async fn get(&self, key: &str) -> Result<Option<String>, TierError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| TierError::Unavailable(e.to_string()))?;

        conn.get::<_, Option<String>>(key)
            .await
            .map_err(|e| TierError::Backend(e.to_string()))
    }

    async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        ttl_secs: u64,
    ) -> Result<(), TierError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| TierError::Unavailable(e.to_string()))?;

        // SETEX rejects a zero expiry
        let ttl_secs = ttl_secs.max(1);
        conn.set_ex::<_, _, ()>(key, value, ttl_secs)
            .await
            .map_err(|e| TierError::Backend(e.to_string()))?;

        debug!(key = %key, ttl_secs, "distributed tier set");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}

/// Builds a Redis connection pool whose checkout, connect and recycle steps
/// are bounded by `timeout`.
///
/// Creating the pool does not connect; an unreachable server shows up later
/// as `TierError::Unavailable` on each call.
pub fn build_redis_pool(url: &str, timeout: Duration) -> Result<Pool, TierError> {
    let mut config = deadpool_redis::Config::from_url(url);
    let mut pool_config = config.get_pool_config();
    pool_config.timeouts.wait = Some(timeout);
    pool_config.timeouts.create = Some(timeout);
    pool_config.timeouts.recycle = Some(timeout);
    config.pool = Some(pool_config);

    config
        .create_pool(Some(Runtime::Tokio1))
        .map_err(|e| TierError::Unavailable(e.to_string()))
}

// == In-Memory Tier ==
/// Process-local stand-in for the shared backend.
///
/// Used when Redis is disabled so a single instance still exercises the
/// two-tier flow.
#[derive(Debug, Default)]
pub struct InMemoryTier {
    entries: DashMap<String, CacheEntry<String>>,
}

impl InMemoryTier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl DistributedTier for InMemoryTier {
    async fn get(&self, key: &str) -> Result<Option<String>, TierError> {
        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired() {
                return Ok(Some(entry.value.clone()));
            }
        }
        self.entries.remove_if(key, |_, entry| entry.is_expired());
        Ok(None)
    }

    async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        ttl_secs: u64,
    ) -> Result<(), TierError> {
        self.entries.insert(
            key.to_string(),
            CacheEntry::new(value.to_string(), Duration::from_secs(ttl_secs)),
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

// == Disabled Tier ==
/// Tier used when no backend could be configured. Every call reports
/// `Unavailable`, which the access layer treats as a miss.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledTier;

#[async_trait]
impl DistributedTier for DisabledTier {
    async fn get(&self, _key: &str) -> Result<Option<String>, TierError> {
        Err(TierError::Unavailable("distributed tier disabled".to_string()))
    }

    async fn set_with_expiry(
        &self,
        _key: &str,
        _value: &str,
        _ttl_secs: u64,
    ) -> Result<(), TierError> {
        Err(TierError::Unavailable("distributed tier disabled".to_string()))
    }

    fn name(&self) -> &'static str {
        "disabled"
    }
}
