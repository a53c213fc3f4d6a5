//! TTL Sweep Task
//!
//! Background task that periodically evicts expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Spawns a background task that periodically evicts expired cache entries.
///
/// Every `interval` the task takes the write lock and evicts entries older
/// than `ttl` according to the store's own clock. A skipped or late sweep only
/// delays eviction; the request path checks TTL before serving regardless.
///
/// # Returns
/// A JoinHandle for the spawned task, aborted during graceful shutdown.
pub fn spawn_sweep_task(
    cache: Arc<RwLock<CacheStore>>,
    interval: Duration,
    ttl: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            interval_ms = interval.as_millis() as u64,
            ttl_ms = ttl.as_millis() as u64,
            "Starting TTL sweep task"
        );

        loop {
            tokio::time::sleep(interval).await;

            let (removed, remaining) = {
                let mut cache_guard = cache.write().await;
                let now = cache_guard.now_ms();
                let removed = cache_guard.evict_expired(now, ttl);
                (removed, cache_guard.len())
            };

            if removed > 0 {
                info!(removed, remaining, "TTL sweep: evicted expired entries");
            } else {
                debug!(remaining, "TTL sweep: no expired entries found");
            }
        }
    })
}
