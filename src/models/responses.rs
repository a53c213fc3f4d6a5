//! Response DTOs for the administrative API
//!
//! Defines the structure of outgoing JSON bodies.

use serde::Serialize;

use crate::cache::CacheStats;

/// Response body for the stats endpoint (GET /api/cache/stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Current number of cached entries
    pub entries: usize,
    /// Total bytes held by the cache
    pub size_bytes: u64,
    /// `size_bytes` in megabytes
    pub size_mb: f64,
    /// Configured size ceiling in bytes
    pub max_size_bytes: u64,
    /// Configured entry time-to-live in milliseconds
    pub ttl_ms: u64,
    /// Entries evicted for outliving the TTL
    pub expired_evictions: u64,
    /// Entries evicted to stay under the size ceiling
    pub size_evictions: u64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from a cache statistics snapshot
    pub fn new(stats: &CacheStats, max_size_bytes: u64, ttl_ms: u64) -> Self {
        Self {
            entries: stats.entry_count,
            size_bytes: stats.total_bytes,
            size_mb: stats.size_mb(),
            max_size_bytes,
            ttl_ms,
            expired_evictions: stats.expired_evictions,
            size_evictions: stats.size_evictions,
        }
    }
}

/// Response body for the clear operation (POST /api/cache/clear)
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    /// Always "cleared"
    pub status: String,
}

impl ClearResponse {
    pub fn cleared() -> Self {
        Self {
            status: "cleared".to_string(),
        }
    }
}

/// Response body for the single-entry eviction (DELETE /api/cache/entry)
#[derive(Debug, Clone, Serialize)]
pub struct EvictResponse {
    /// Success message
    pub message: String,
    /// The cache key that was removed
    pub key: String,
}

impl EvictResponse {
    /// Creates a new EvictResponse
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Entry '{}' evicted successfully", key),
            key,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
