//! API Handlers
//!
//! Shared application state and the administrative JSON endpoints.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Query, State},
    Json,
};
use tokio::sync::RwLock;
use tracing::info;

use crate::assets::FileStore;
use crate::cache::CacheStore;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{ClearResponse, EvictRequest, EvictResponse, HealthResponse, StatsResponse};

/// Application state shared across all handlers.
///
/// The cache store sits behind a single lock so its entries and aggregates
/// change together. Disk reads happen outside the lock.
#[derive(Clone)]
pub struct AppState {
    /// Thread-safe cache store
    pub cache: Arc<RwLock<CacheStore>>,
    /// Files under the serving root
    pub files: FileStore,
    /// Entry time-to-live
    pub ttl: Duration,
}

impl AppState {
    /// Creates a new AppState around the given cache store.
    pub fn new(cache: CacheStore, files: FileStore, ttl: Duration) -> Self {
        Self {
            cache: Arc::new(RwLock::new(cache)),
            files,
            ttl,
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        let cache = CacheStore::new(config.max_size_bytes());
        let files = FileStore::new(config.serve_root.clone());
        Self::new(cache, files, config.ttl())
    }
}

/// Handler for GET /api/cache/stats
///
/// Returns the current entry count and size of the cache.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.cache.read().await;

    Json(StatsResponse::new(
        &cache.stats(),
        cache.max_bytes(),
        state.ttl.as_millis() as u64,
    ))
}

/// Handler for POST /api/cache/clear
///
/// Drops every cached entry and resets the aggregates.
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    let mut cache = state.cache.write().await;
    let dropped = cache.len();
    cache.init();

    info!(dropped, "Cache cleared");
    Json(ClearResponse::cleared())
}

/// Handler for DELETE /api/cache/entry?path=...
///
/// Removes the cached entry for one request path.
pub async fn evict_handler(
    State(state): State<AppState>,
    Query(req): Query<EvictRequest>,
) -> Result<Json<EvictResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let key = state.files.key_for(&req.path)?;

    let mut cache = state.cache.write().await;
    cache.remove(&key)?;

    info!(key = %key, "Cache entry evicted");
    Ok(Json(EvictResponse::new(key)))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
