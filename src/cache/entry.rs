//! Cache Entry Module
//!
//! Defines a single stored value with the metadata used for expiry and
//! capacity accounting.

use std::time::{Duration, Instant};

use bytes::Bytes;

// == Cache Entry ==
/// A stored value plus its insertion time and accounted size.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored value, opaque to the cache
    pub value: Bytes,
    /// When the entry was written
    pub stored_at: Instant,
    /// Bytes charged against the shard capacity (key + value)
    pub size_bytes: usize,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry for `key` holding `value`, stamped with `now`.
    pub fn new(key: &str, value: Bytes, now: Instant) -> Self {
        let size_bytes = entry_size(key, &value);
        Self {
            value,
            stored_at: now,
            size_bytes,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry has outlived `ttl` at `now`.
    ///
    /// Boundary condition: an entry whose age equals `ttl` is already expired.
    /// Instants earlier than `stored_at` count as age zero.
    pub fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        self.age(now) >= ttl
    }

    // == Age ==
    /// Time elapsed since the entry was written.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.stored_at)
    }
}

/// Bytes an entry for `key` holding `value` is charged.
pub fn entry_size(key: &str, value: &[u8]) -> usize {
    key.len() + value.len()
}
