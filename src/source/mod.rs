//! Source-of-Record Module
//!
//! Authoritative storage for each owner's collection. The access layer only
//! depends on the `SourceAdapter` trait; `StubSource` is an in-memory stand-in
//! for a real database.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::Collection;

/// Items every new owner starts with.
pub const DEFAULT_SEED: [&str; 3] = [
    "Create new todo",
    "Implement Cache-Aside pattern",
    "Deploy to Azure",
];

// == Source Error ==
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("failed to load collection for {owner_key}: {reason}")]
    Load { owner_key: String, reason: String },

    #[error("failed to persist collection for {owner_key}: {reason}")]
    Persist { owner_key: String, reason: String },
}

// == Source Adapter Trait ==
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Returns the owner's collection, seeding a default one on first access.
    async fn load(&self, owner_key: &str) -> Result<Collection, SourceError>;

    /// Stores `collection` as the owner's authoritative state.
    async fn persist(&self, owner_key: &str, collection: &Collection) -> Result<(), SourceError>;
}

type SeedFn = Arc<dyn Fn(&str) -> Collection + Send + Sync>;

// == Stub Source ==
/// In-memory source of record with simulated latency.
#[derive(Clone)]
pub struct StubSource {
    collections: Arc<DashMap<String, Collection>>,
    latency: Duration,
    seed: SeedFn,
}

impl StubSource {
    /// Creates a stub that sleeps `latency` on every call.
    pub fn new(latency: Duration) -> Self {
        Self {
            collections: Arc::new(DashMap::new()),
            latency,
            seed: Arc::new(|owner_key| Collection::seeded(owner_key, DEFAULT_SEED)),
        }
    }

    /// Replaces the seed policy applied to owners with no stored collection.
    pub fn with_seed<F>(mut self, seed: F) -> Self
    where
        F: Fn(&str) -> Collection + Send + Sync + 'static,
    {
        self.seed = Arc::new(seed);
        self
    }

    /// Stored collection for `owner_key`, if one was persisted or seeded.
    pub fn stored(&self, owner_key: &str) -> Option<Collection> {
        self.collections.get(owner_key).map(|c| c.value().clone())
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

impl Default for StubSource {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}

#[async_trait]
impl SourceAdapter for StubSource {
    async fn load(&self, owner_key: &str) -> Result<Collection, SourceError> {
        self.simulate_latency().await;
        info!(owner_key = %owner_key, "loading collection from source");

        let collection = self
            .collections
            .entry(owner_key.to_string())
            .or_insert_with(|| (self.seed)(owner_key))
            .value()
            .clone();
        Ok(collection)
    }

    async fn persist(&self, owner_key: &str, collection: &Collection) -> Result<(), SourceError> {
        self.simulate_latency().await;
        self.collections
            .insert(owner_key.to_string(), collection.clone());

        debug!(
            owner_key = %owner_key,
            item_count = collection.len(),
            last_inserted_id = collection.last_inserted_id,
            "persisted collection"
        );
        Ok(())
    }
}
