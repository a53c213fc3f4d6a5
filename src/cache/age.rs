//! Age Index Module
//!
//! Orders cached keys by insertion time for oldest-first eviction.

use std::collections::BTreeSet;

// == Age Index ==
/// Tracks keys ordered by `(inserted_at, seq)`.
///
/// The first element is always the oldest entry. `seq` is a per-store counter,
/// so entries inserted within the same millisecond leave in insertion order.
#[derive(Debug, Default)]
pub struct AgeIndex {
    order: BTreeSet<(u64, u64, String)>,
}

impl AgeIndex {
    // == Constructor ==
    pub fn new() -> Self {
        Self {
            order: BTreeSet::new(),
        }
    }

    // == Insert ==
    /// Records a key inserted at `inserted_at` with sequence number `seq`.
    pub fn insert(&mut self, key: &str, inserted_at: u64, seq: u64) {
        self.order.insert((inserted_at, seq, key.to_string()));
    }

    // == Remove ==
    /// Forgets a key. The caller supplies the position it was inserted with.
    pub fn remove(&mut self, key: &str, inserted_at: u64, seq: u64) -> bool {
        self.order.remove(&(inserted_at, seq, key.to_string()))
    }

    // == Pop Oldest ==
    /// Removes and returns the oldest key.
    pub fn pop_oldest(&mut self) -> Option<String> {
        self.order.pop_first().map(|(_, _, key)| key)
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.order.clear();
    }
}
