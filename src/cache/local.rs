//! Local Cache Tier
//!
//! In-process key/value store with TTL expiry. Access is synchronous and
//! never blocks on I/O.

use std::time::Duration;

use dashmap::DashMap;

use crate::cache::{CacheEntry, CacheStats};
use crate::models::Collection;

// == Local Tier ==
/// Instance-local collection cache.
///
/// Expired entries are dropped lazily on `get` and in bulk by
/// `cleanup_expired`; both paths count an invalidation.
#[derive(Debug)]
pub struct LocalTier {
    entries: DashMap<String, CacheEntry<Collection>>,
    stats: CacheStats,
}

impl LocalTier {
    // == Constructor ==
    /// Creates an empty tier reporting expiries to `stats`.
    pub fn new(stats: CacheStats) -> Self {
        Self {
            entries: DashMap::new(),
            stats,
        }
    }

    // == Get ==
    /// Returns the cached collection if present and unexpired.
    pub fn get(&self, key: &str) -> Option<Collection> {
        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired() {
                return Some(entry.value.clone());
            }
        }

        // Only drop the entry if it is still the expired one; a concurrent
        // put may already have replaced it.
        if self
            .entries
            .remove_if(key, |_, entry| entry.is_expired())
            .is_some()
        {
            self.stats.record_invalidation();
        }
        None
    }

    // == Put ==
    /// Stores `value` under `key`, replacing any previous entry and TTL.
    pub fn put(&self, key: &str, value: Collection, ttl: Duration) {
        self.entries
            .insert(key.to_string(), CacheEntry::new(value, ttl));
    }

    // == Cleanup Expired ==
    /// Removes all expired entries.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&self) -> usize {
        let mut removed = 0;
        self.entries.retain(|_, entry| {
            let keep = !entry.is_expired();
            if !keep {
                removed += 1;
            }
            keep
        });

        for _ in 0..removed {
            self.stats.record_invalidation();
        }
        removed
    }

    // == Length ==
    /// Returns the number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
