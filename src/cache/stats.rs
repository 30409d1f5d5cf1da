//! Cache Statistics Module
//!
//! Tracks hits, misses, evictions and memory usage per shard and across the cache.

use serde::Serialize;

// == Cache Stats ==
/// Snapshot of cache counters and memory usage.
///
/// A shard keeps one of these under its lock; the cache sums them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of reads that found a live entry
    pub hits: u64,
    /// Number of reads that found nothing or an expired entry
    pub misses: u64,
    /// Number of entries evicted to make room for new writes
    pub evictions: u64,
    /// Number of entries removed by the expiry sweep
    pub expirations: u64,
    /// Current number of entries
    pub total_entries: usize,
    /// Bytes currently charged against capacity
    pub used_bytes: usize,
    /// Capacity ceiling in bytes
    pub capacity_bytes: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Record Hit ==
    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    // == Record Miss ==
    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Evictions ==
    /// Adds `count` capacity evictions.
    pub fn record_evictions(&mut self, count: usize) {
        self.evictions += count as u64;
    }

    // == Record Expirations ==
    /// Adds `count` expired removals.
    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }

    // == Merge ==
    /// Folds another snapshot into this one.
    ///
    /// Capacity saturates so unbounded shards stay unbounded in the sum.
    pub fn merge(&mut self, other: &CacheStats) {
        self.hits += other.hits;
        self.misses += other.misses;
        self.evictions += other.evictions;
        self.expirations += other.expirations;
        self.total_entries += other.total_entries;
        self.used_bytes += other.used_bytes;
        self.capacity_bytes = self.capacity_bytes.saturating_add(other.capacity_bytes);
    }
}
