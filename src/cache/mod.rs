//! Cache Module
//!
//! The two cache tiers consulted by the access layer and the statistics they
//! feed.
//!
//! ```text
//! read → LocalTier (in-process) → DistributedTier (Redis) → source of record
//! ```

mod distributed;
mod entry;
mod local;
mod stats;


// Re-export public types
pub use distributed::{
    build_redis_pool, DisabledTier, DistributedTier, InMemoryTier, RedisTier, TierError,
};
pub use entry::{current_timestamp_ms, CacheEntry};
pub use local::LocalTier;
pub use stats::{hit_ratio, CacheStats, StatsSnapshot};

// == Public Constants ==
/// Name reported by the monitoring surface
pub const CACHE_PATTERN: &str = "Cache-Aside";
