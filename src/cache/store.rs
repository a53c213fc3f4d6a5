//! Cache Store Module
//!
//! Main cache engine: HashMap storage with an insertion-age index, running
//! size aggregates, TTL expiry and size-budget eviction.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::cache::{AgeIndex, CacheEntry, CacheStats, Clock, MonotonicClock};
use crate::error::{CacheError, Result};

// == Cache Store ==
/// Path-keyed store of cached file bodies.
///
/// `stats.total_bytes` always equals the sum of entry sizes and
/// `stats.entry_count` the number of entries; every mutation updates the map,
/// the age index and the aggregates together.
#[derive(Debug)]
pub struct CacheStore {
    /// Entries by cache key
    entries: HashMap<String, CacheEntry>,
    /// Oldest-first ordering of the same keys
    ages: AgeIndex,
    /// Running aggregates and eviction counters
    stats: CacheStats,
    /// Size ceiling enforced after every insertion
    max_bytes: u64,
    /// Next insertion sequence number
    next_seq: u64,
    /// Time source for `inserted_at`
    clock: Arc<dyn Clock>,
    /// Largest buffer `copy_buffer` will reserve
    #[cfg(test)]
    reservation_limit: Option<usize>,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store holding at most `max_bytes` of cached data.
    pub fn new(max_bytes: u64) -> Self {
        Self::with_clock(max_bytes, Arc::new(MonotonicClock::new()))
    }

    /// Creates an empty store that stamps entries using `clock`.
    pub fn with_clock(max_bytes: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            ages: AgeIndex::new(),
            stats: CacheStats::new(),
            max_bytes,
            next_seq: 0,
            clock,
            #[cfg(test)]
            reservation_limit: None,
        }
    }

    /// Makes every reservation larger than `limit` bytes fail.
    #[cfg(test)]
    pub(crate) fn fail_reservations_over(&mut self, limit: usize) {
        self.reservation_limit = Some(limit);
    }

    // == Init ==
    /// Drops every entry and zeroes all aggregates.
    ///
    /// Safe to call on an empty or a populated store.
    pub fn init(&mut self) {
        self.entries = HashMap::new();
        self.ages.clear();
        self.stats = CacheStats::new();
        self.next_seq = 0;
    }

    // == Now ==
    /// Current reading of the store's clock, in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    // == Get ==
    /// Looks up an entry by key.
    ///
    /// Returns whatever is stored, expired or not. TTL is the caller's concern
    /// here; the lookup never mutates the store.
    pub fn get(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    // == Add ==
    /// Copies `data` into the store under `key`, replacing any previous entry.
    ///
    /// If the store then holds more than `max_bytes`, the oldest entries are
    /// evicted until it fits again (possibly including the new one).
    ///
    /// # Errors
    /// - `InvalidRequest` if `key` is empty
    /// - `AllocationFailure` if the owned copy cannot be allocated; the store
    ///   is left untouched
    pub fn add(
        &mut self,
        key: &str,
        data: &[u8],
        validator: Option<String>,
        source_mod_time: Option<DateTime<Utc>>,
    ) -> Result<()> {
        if key.is_empty() {
            return Err(CacheError::InvalidRequest(
                "Cache key cannot be empty".to_string(),
            ));
        }

        // Allocate before touching anything so a failure leaves no trace
        let owned = self.copy_buffer(data)?;

        self.remove_entry(key);

        let inserted_at = self.clock.now_ms();
        let seq = self.next_seq;
        self.next_seq += 1;

        let entry = CacheEntry::new(
            key.to_string(),
            owned,
            validator,
            source_mod_time,
            inserted_at,
            seq,
        );
        self.stats.record_insert(entry.size());
        self.ages.insert(key, inserted_at, seq);
        self.entries.insert(key.to_string(), entry);

        if self.stats.total_bytes > self.max_bytes {
            let evicted = self.evict_oldest(self.max_bytes);
            debug!(
                key,
                evicted,
                total_bytes = self.stats.total_bytes,
                max_bytes = self.max_bytes,
                "Size ceiling exceeded, evicted oldest entries"
            );
        }

        Ok(())
    }

    // == Remove ==
    /// Removes an entry by key, releasing its buffer.
    pub fn remove(&mut self, key: &str) -> Result<()> {
        match self.remove_entry(key) {
            Some(_) => Ok(()),
            None => Err(CacheError::NotFound(key.to_string())),
        }
    }

    // == Evict Expired ==
    /// Removes every entry whose age at `now_ms` exceeds `ttl`.
    ///
    /// Returns the number of entries removed.
    pub fn evict_expired(&mut self, now_ms: u64, ttl: Duration) -> usize {
        let expired: Vec<String> = self
            .entries
            .values()
            .filter(|entry| entry.is_expired(now_ms, ttl))
            .map(|entry| entry.key().to_string())
            .collect();

        for key in &expired {
            self.remove_entry(key);
        }

        self.stats.record_expired(expired.len());
        expired.len()
    }

    // == Evict Oldest ==
    /// Removes oldest-inserted entries until `total_bytes <= ceiling` or the
    /// store is empty.
    ///
    /// Returns the number of entries removed.
    pub fn evict_oldest(&mut self, ceiling: u64) -> usize {
        let mut evicted = 0;

        while self.stats.total_bytes > ceiling {
            let Some(key) = self.ages.pop_oldest() else {
                break;
            };
            if let Some(entry) = self.entries.remove(&key) {
                self.stats.record_removal(entry.size());
                self.stats.record_size_eviction();
                evicted += 1;
            }
        }

        evicted
    }

    // == Stats ==
    /// Returns a snapshot of the aggregates.
    pub fn stats(&self) -> CacheStats {
        self.stats.clone()
    }

    pub fn total_bytes(&self) -> u64 {
        self.stats.total_bytes
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over stored keys in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Copies caller data into a freshly allocated, exclusively owned buffer.
    fn copy_buffer(&self, data: &[u8]) -> Result<Bytes> {
        #[cfg(test)]
        if self.reservation_limit.is_some_and(|limit| data.len() > limit) {
            return Err(CacheError::AllocationFailure(format!(
                "{} bytes: over reservation limit",
                data.len()
            )));
        }

        let mut buf = Vec::new();
        buf.try_reserve_exact(data.len()).map_err(|e| {
            CacheError::AllocationFailure(format!("{} bytes: {}", data.len(), e))
        })?;
        buf.extend_from_slice(data);
        Ok(Bytes::from(buf))
    }

    fn remove_entry(&mut self, key: &str) -> Option<CacheEntry> {
        let entry = self.entries.remove(key)?;
        self.ages.remove(key, entry.inserted_at(), entry.seq);
        self.stats.record_removal(entry.size());
        Some(entry)
    }
}
