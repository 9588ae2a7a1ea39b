//! Local Tier Sweep Task
//!
//! Background task that periodically drops expired local tier entries.
//! Lazy expiry on read already hides them; the sweep bounds memory held by
//! owners who stopped reading.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::LocalTier;

/// Spawns a background task that periodically cleans up expired entries.
///
/// # Arguments
/// * `tier` - Shared local tier
/// * `cleanup_interval_secs` - Interval in seconds between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_cleanup_task(tier: Arc<LocalTier>, cleanup_interval_secs: u64) -> JoinHandle<()> {
    spawn_cleanup_task_every(tier, Duration::from_secs(cleanup_interval_secs.max(1)))
}

/// Same as [`spawn_cleanup_task`] with a sub-second interval.
pub fn spawn_cleanup_task_every(tier: Arc<LocalTier>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(interval_ms = interval.as_millis() as u64, "starting local tier sweep");

        loop {
            tokio::time::sleep(interval).await;

            let removed = tier.cleanup_expired();
            if removed > 0 {
                info!(removed, remaining = tier.len(), "local tier sweep removed expired entries");
            } else {
                debug!("local tier sweep: no expired entries found");
            }
        }
    })
}
