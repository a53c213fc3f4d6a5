//! Cache Entry Module
//!
//! Defines a single cached asset together with the metadata needed to age it
//! and to answer conditional requests.

use std::time::Duration;

use axum::body::Bytes;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

// == Cache Entry ==
/// A cached file body and its metadata.
///
/// Entries are immutable once built and are only ever built by
/// [`CacheStore::add`](crate::cache::CacheStore::add).
#[derive(Debug, Clone)]
pub struct CacheEntry {
    key: String,
    data: Bytes,
    size: u64,
    validator: Option<String>,
    source_mod_time: Option<DateTime<Utc>>,
    inserted_at: u64,
    /// Per-store insertion sequence, breaks ties on `inserted_at`
    pub(crate) seq: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Builds an entry around an already-owned buffer.
    pub(crate) fn new(
        key: String,
        data: Bytes,
        validator: Option<String>,
        source_mod_time: Option<DateTime<Utc>>,
        inserted_at: u64,
        seq: u64,
    ) -> Self {
        let size = data.len() as u64;
        Self {
            key,
            data,
            size,
            validator,
            source_mod_time,
            inserted_at,
            seq,
        }
    }

    /// The cache key this entry is stored under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read-only view of the cached bytes.
    ///
    /// Cloning the returned `Bytes` shares the buffer without copying it.
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Size of the cached body in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn validator(&self) -> Option<&str> {
        self.validator.as_deref()
    }

    pub fn source_mod_time(&self) -> Option<DateTime<Utc>> {
        self.source_mod_time
    }

    /// Clock reading (milliseconds) at insertion.
    pub fn inserted_at(&self) -> u64 {
        self.inserted_at
    }

    // == Age ==
    /// Milliseconds since insertion, zero if `now_ms` precedes insertion.
    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.inserted_at)
    }

    // == Is Expired ==
    /// Checks whether the entry has outlived `ttl`.
    ///
    /// An entry is expired only once its age is strictly greater than the TTL,
    /// so an entry aged exactly `ttl` is still served.
    pub fn is_expired(&self, now_ms: u64, ttl: Duration) -> bool {
        u128::from(self.age_ms(now_ms)) > ttl.as_millis()
    }
}

// == Validator Generation ==
/// Builds a quoted ETag from the key and the source modification time.
///
/// The tag identifies a (path, mtime) pair rather than the content, so an edit
/// that keeps the same mtime second keeps the same tag.
pub fn generate_validator(key: &str, source_mod_time: Option<DateTime<Utc>>) -> String {
    let digest = Sha256::digest(key.as_bytes());
    let mtime = source_mod_time
        .map(|t| t.timestamp().max(0) as u64)
        .unwrap_or(0);

    format!("\"{}-{:x}\"", hex::encode(&digest[..4]), mtime)
}
