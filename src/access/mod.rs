//! Cache-Aside Access Layer
//!
//! Orchestrates reads and writes across the local tier, the distributed tier
//! and the source of record.
//!
//! # Read path
//! 1. Local tier hit → return (hit)
//! 2. Distributed tier hit → backfill local tier, return (hit)
//! 3. Miss → load from source, populate both tiers (miss + set)
//!
//! # Write path (write-through)
//! Load via the read path, mutate, persist to the source, then refresh both
//! tiers and publish an audit event in the background. Persistence always
//! completes before either tier sees the new state.
//!
//! Distributed tier failures degrade to local-only operation. Only source
//! failures reach the caller. Concurrent writers for the same owner are not
//! serialized; the last persisted collection wins.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::audit::{AuditEvent, AuditOperation, AuditPublisher, LoggingAuditPublisher};
use crate::cache::{
    CacheStats, DisabledTier, DistributedTier, LocalTier, StatsSnapshot, TierError,
};
use crate::config::Config;
use crate::error::{Result, ServiceError};
use crate::models::{validate_content, Collection, Item};
use crate::source::SourceAdapter;

// == Access Settings ==
/// Tunables of the access layer.
///
/// The TTL is held in whole seconds, at least one, so the local tier and
/// the distributed tier expire entries at the same moment.
#[derive(Debug, Clone)]
pub struct AccessSettings {
    key_prefix: String,
    ttl_secs: u64,
    tier_timeout: Duration,
    source_timeout: Duration,
}

impl AccessSettings {
    /// `tier_timeout` bounds each distributed tier and audit call,
    /// `source_timeout` each source of record call.
    pub fn new(
        key_prefix: impl Into<String>,
        ttl_secs: u64,
        tier_timeout: Duration,
        source_timeout: Duration,
    ) -> Self {
        Self {
            key_prefix: key_prefix.into(),
            ttl_secs: ttl_secs.max(1),
            tier_timeout,
            source_timeout,
        }
    }

    pub fn key_prefix(&self) -> &str {
        &self.key_prefix
    }

    /// TTL applied to both tiers.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    pub fn tier_timeout(&self) -> Duration {
        self.tier_timeout
    }

    pub fn source_timeout(&self) -> Duration {
        self.source_timeout
    }
}

impl Default for AccessSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for AccessSettings {
    fn from(config: &Config) -> Self {
        Self::new(
            config.cache_prefix.clone(),
            config.cache_ttl_secs(),
            config.tier_timeout(),
            config.source_timeout(),
        )
    }
}

// == Cache-Aside Layer ==
/// The data-access layer in front of the source of record.
pub struct CacheAsideLayer {
    local: Arc<LocalTier>,
    distributed: Arc<dyn DistributedTier>,
    source: Arc<dyn SourceAdapter>,
    audit: Arc<dyn AuditPublisher>,
    stats: CacheStats,
    settings: AccessSettings,
}

impl CacheAsideLayer {
    // == Constructor ==
    /// Creates a layer with a fresh local tier reporting into `stats`.
    ///
    /// The distributed tier starts disabled and audit events go to the log
    /// until replaced with `with_distributed` / `with_audit`.
    pub fn new(
        settings: AccessSettings,
        stats: CacheStats,
        source: Arc<dyn SourceAdapter>,
    ) -> Self {
        Self {
            local: Arc::new(LocalTier::new(stats.clone())),
            distributed: Arc::new(DisabledTier),
            source,
            audit: Arc::new(LoggingAuditPublisher),
            stats,
            settings,
        }
    }

    pub fn with_distributed(mut self, distributed: Arc<dyn DistributedTier>) -> Self {
        self.distributed = distributed;
        self
    }

    pub fn with_audit(mut self, audit: Arc<dyn AuditPublisher>) -> Self {
        self.audit = audit;
        self
    }

    /// Local tier handle, shared with the background sweep.
    pub fn local_tier(&self) -> Arc<LocalTier> {
        Arc::clone(&self.local)
    }

    pub fn settings(&self) -> &AccessSettings {
        &self.settings
    }

    pub fn cache_key(&self, owner_key: &str) -> String {
        format!("{}{}", self.settings.key_prefix(), owner_key)
    }

    // == Read ==
    /// Returns the owner's collection, consulting local tier, distributed
    /// tier and source in that order.
    pub async fn read(&self, owner_key: &str) -> Result<Collection> {
        let key = self.cache_key(owner_key);

        if let Some(collection) = self.local.get(&key) {
            self.stats.record_hit();
            debug!(owner_key = %owner_key, tier = "local", "cache hit");
            return Ok(collection);
        }

        match self.distributed_get(&key).await {
            Ok(Some(collection)) => {
                self.local.put(&key, collection.clone(), self.settings.ttl());
                self.stats.record_hit();
                debug!(owner_key = %owner_key, tier = self.distributed.name(), "cache hit");
                return Ok(collection);
            }
            Ok(None) => {}
            Err(e) => {
                warn!(
                    owner_key = %owner_key,
                    tier = self.distributed.name(),
                    error = %e,
                    "distributed tier read failed, treating as miss"
                );
            }
        }

        self.stats.record_miss();
        info!(owner_key = %owner_key, "cache miss");

        let collection = self.load_from_source(owner_key).await?;
        self.populate(&key, &collection).await;
        Ok(collection)
    }

    /// Items of the owner's collection, in no particular order.
    pub async fn list(&self, owner_key: &str) -> Result<Vec<Item>> {
        Ok(self.read(owner_key).await?.to_list())
    }

    // == Create ==
    /// Adds a todo with trimmed `content` and returns it.
    pub async fn create(&self, owner_key: &str, content: &str) -> Result<Item> {
        let content = validate_content(content)?;

        let mut collection = self.read(owner_key).await?;
        let item = collection.push(content);

        self.persist(owner_key, &collection).await?;
        self.populate(&self.cache_key(owner_key), &collection).await;
        info!(owner_key = %owner_key, item_id = item.id, "todo created");

        self.publish_audit(AuditOperation::Create, owner_key, item.id);
        Ok(item)
    }

    // == Delete ==
    /// Removes the todo `id` from the owner's collection.
    pub async fn delete(&self, owner_key: &str, id: u64) -> Result<()> {
        if id == 0 {
            return Err(ServiceError::InvalidInput("Invalid todo ID".to_string()));
        }

        let mut collection = self.read(owner_key).await?;
        if collection.remove(id).is_none() {
            return Err(ServiceError::NotFound("Todo not found".to_string()));
        }

        self.persist(owner_key, &collection).await?;
        self.populate(&self.cache_key(owner_key), &collection).await;
        info!(owner_key = %owner_key, item_id = id, "todo deleted");

        self.publish_audit(AuditOperation::Delete, owner_key, id);
        Ok(())
    }

    // == Statistics ==
    /// Current statistics; never mutates state.
    pub fn statistics(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    // == Internals ==
    async fn distributed_get(
        &self,
        key: &str,
    ) -> std::result::Result<Option<Collection>, TierError> {
        let read = self.distributed.get(key);
        let payload = with_deadline(self.settings.tier_timeout(), read).await?;

        payload
            .map(|raw| {
                serde_json::from_str::<Collection>(&raw)
                    .map_err(|e| TierError::Malformed(e.to_string()))
            })
            .transpose()
    }

    /// Writes `collection` to both tiers. Distributed failures are logged and
    /// leave the local copy in place.
    async fn populate(&self, key: &str, collection: &Collection) {
        self.local.put(key, collection.clone(), self.settings.ttl());
        self.stats.record_set();

        let payload = match serde_json::to_string(collection) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(key = %key, error = %e, "failed to serialize collection");
                return;
            }
        };

        let ttl_secs = self.settings.ttl_secs();
        let write = self.distributed.set_with_expiry(key, &payload, ttl_secs);
        match with_deadline(self.settings.tier_timeout(), write).await {
            Ok(()) => debug!(key = %key, ttl_secs, "cache populated"),
            Err(e) => warn!(
                key = %key,
                tier = self.distributed.name(),
                error = %e,
                "distributed tier write failed, continuing with local tier only"
            ),
        }
    }

    async fn load_from_source(&self, owner_key: &str) -> Result<Collection> {
        match timeout(self.settings.source_timeout(), self.source.load(owner_key)).await {
            Ok(Ok(collection)) => Ok(collection),
            Ok(Err(e)) => Err(ServiceError::SourceUnavailable(e.to_string())),
            Err(_) => Err(ServiceError::SourceUnavailable(format!(
                "load for {} timed out after {:?}",
                owner_key, self.settings.source_timeout()
            ))),
        }
    }

    async fn persist(&self, owner_key: &str, collection: &Collection) -> Result<()> {
        let write = self.source.persist(owner_key, collection);
        match timeout(self.settings.source_timeout(), write).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(ServiceError::SourceUnavailable(e.to_string())),
            Err(_) => Err(ServiceError::SourceUnavailable(format!(
                "persist for {} timed out after {:?}",
                owner_key, self.settings.source_timeout()
            ))),
        }
    }

    /// Emits the audit event on a background task bounded by the tier
    /// deadline. The write never waits for delivery.
    fn publish_audit(&self, operation: AuditOperation, owner_key: &str, item_id: u64) {
        // Built here so the event carries the caller's trace id
        let event = AuditEvent::new(operation, owner_key, item_id);
        let audit = Arc::clone(&self.audit);
        let deadline = self.settings.tier_timeout();

        tokio::spawn(async move {
            match timeout(deadline, audit.publish(&event)).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(
                    operation = %event.operation,
                    owner_key = %event.owner_key,
                    error = %e,
                    "audit publish failed"
                ),
                Err(_) => warn!(
                    operation = %event.operation,
                    owner_key = %event.owner_key,
                    "audit publish timed out"
                ),
            }
        });
    }
}

/// Bounds a tier call by `deadline`, mapping expiry to `TierError::Timeout`.
async fn with_deadline<T, F>(deadline: Duration, call: F) -> std::result::Result<T, TierError>
where
    F: Future<Output = std::result::Result<T, TierError>>,
{
    timeout(deadline, call)
        .await
        .unwrap_or(Err(TierError::Timeout(deadline)))
}
