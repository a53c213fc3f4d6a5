//! Cache Module
//!
//! Provides in-memory caching of file bodies with TTL expiry and
//! size-budget eviction.

mod age;
mod clock;
mod entry;
mod stats;
mod store;


// Re-export public types
pub use age::AgeIndex;
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use entry::{generate_validator, CacheEntry};
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Bytes in one megabyte, as used by the size ceiling configuration
pub const BYTES_PER_MB: u64 = 1024 * 1024;
