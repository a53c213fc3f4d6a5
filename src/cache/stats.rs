//! Cache Statistics Module
//!
//! Snapshot of the store's running aggregates and eviction counters.

use serde::Serialize;

use crate::cache::BYTES_PER_MB;

// == Cache Stats ==
/// Aggregates maintained by the cache store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of entries currently stored
    pub entry_count: usize,
    /// Sum of the sizes of all stored entries
    pub total_bytes: u64,
    /// Entries removed because they outlived the TTL
    pub expired_evictions: u64,
    /// Entries removed to bring the store back under its size ceiling
    pub size_evictions: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Size In Megabytes ==
    pub fn size_mb(&self) -> f64 {
        self.total_bytes as f64 / BYTES_PER_MB as f64
    }

    // == Record Insert ==
    pub(crate) fn record_insert(&mut self, size: u64) {
        self.entry_count += 1;
        self.total_bytes += size;
    }

    // == Record Removal ==
    pub(crate) fn record_removal(&mut self, size: u64) {
        self.entry_count -= 1;
        self.total_bytes -= size;
    }

    pub(crate) fn record_expired(&mut self, count: usize) {
        self.expired_evictions += count as u64;
    }

    pub(crate) fn record_size_eviction(&mut self) {
        self.size_evictions += 1;
    }
}
