//! Cache Statistics Module
//!
//! Tracks access-layer performance: hits, misses, sets and invalidations.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;

use crate::cache::CACHE_PATTERN;

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    sets: AtomicU64,
    invalidations: AtomicU64,
}

// == Cache Stats ==
/// Shared handle to the process-wide cache counters.
///
/// Cloning is cheap and every clone updates the same counters. Counters only
/// ever increase.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    counters: Arc<Counters>,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read served by either cache tier.
    pub fn record_hit(&self) {
        self.counters.hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Read that had to go to the source of record.
    pub fn record_miss(&self) {
        self.counters.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Collection written to the cache tiers.
    pub fn record_set(&self) {
        self.counters.sets.fetch_add(1, Ordering::Relaxed);
    }

    /// Cached copy dropped on expiry.
    pub fn record_invalidation(&self) {
        self.counters.invalidations.fetch_add(1, Ordering::Relaxed);
    }

    // == Snapshot ==
    /// Returns a point-in-time copy of the counters with derived values.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot::new(
            self.counters.hits.load(Ordering::Relaxed),
            self.counters.misses.load(Ordering::Relaxed),
            self.counters.sets.load(Ordering::Relaxed),
            self.counters.invalidations.load(Ordering::Relaxed),
        )
    }
}

// == Stats Snapshot ==
/// Read-only statistics report for monitoring endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    pub invalidations: u64,
    /// hits + misses
    pub total: u64,
    /// Percentage of reads served from cache, rounded to 2 decimals
    pub hit_ratio: f64,
    pub timestamp: String,
    pub pattern: String,
}

impl StatsSnapshot {
    pub fn new(hits: u64, misses: u64, sets: u64, invalidations: u64) -> Self {
        let total = hits + misses;
        Self {
            hits,
            misses,
            sets,
            invalidations,
            total,
            hit_ratio: hit_ratio(hits, total),
            timestamp: chrono::Utc::now().to_rfc3339(),
            pattern: CACHE_PATTERN.to_string(),
        }
    }
}

// == Hit Ratio ==
/// `100 * hits / total` rounded to 2 decimals, or 0 when there were no reads.
pub fn hit_ratio(hits: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let percent = hits as f64 * 100.0 / total as f64;
    (percent * 100.0).round() / 100.0
}
