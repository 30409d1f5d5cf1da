//! Cache Shard Module
//!
//! An independently locked, byte-bounded partition of the key space.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use bytes::Bytes;
use parking_lot::Mutex;

use crate::cache::entry::entry_size;
use crate::cache::{CacheEntry, CacheStats, EvictionQueue};
use crate::error::{CacheError, Result};

// == Shard ==
/// A fixed-capacity bucket of entries behind its own mutex.
///
/// Every operation takes the lock for its whole duration and only does
/// in-memory work while holding it. No shard ever locks another shard.
#[derive(Debug)]
pub struct Shard {
    state: Mutex<ShardState>,
    capacity_bytes: usize,
}

/// Everything guarded by the shard lock.
#[derive(Debug, Default)]
struct ShardState {
    entries: HashMap<String, CacheEntry>,
    order: EvictionQueue,
    /// Sum of `size_bytes` over `entries`
    used_bytes: usize,
    stats: CacheStats,
}

impl Shard {
    // == Constructor ==
    /// Creates an empty shard that holds at most `capacity_bytes`.
    pub fn new(capacity_bytes: usize) -> Self {
        Self {
            state: Mutex::new(ShardState::default()),
            capacity_bytes,
        }
    }

    // == Get ==
    /// Returns the value for `key` if present and younger than `ttl` at `now`.
    ///
    /// Expired entries read as absent but stay in place until the next sweep.
    pub fn get(&self, key: &str, now: Instant, ttl: Duration) -> Option<Bytes> {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        let value = state
            .entries
            .get(key)
            .filter(|entry| !entry.is_expired(now, ttl))
            .map(|entry| entry.value.clone());

        match value {
            Some(_) => state.stats.record_hit(),
            None => state.stats.record_miss(),
        }
        value
    }

    // == Set ==
    /// Inserts or overwrites `key`, stamping the entry with `now`.
    ///
    /// Evicts the oldest entries of this shard until the new one fits.
    /// Returns the number of entries evicted. Fails with `Oversize`, leaving
    /// the shard untouched, when the entry alone exceeds the shard capacity.
    pub fn set(&self, key: &str, value: Bytes, now: Instant) -> Result<usize> {
        let size = entry_size(key, &value);
        if size > self.capacity_bytes {
            return Err(CacheError::Oversize {
                size,
                max: self.capacity_bytes,
            });
        }

        let mut guard = self.state.lock();
        let state = &mut *guard;

        state.remove(key);

        let mut evicted = 0;
        while state.used_bytes + size > self.capacity_bytes {
            let Some((_, victim)) = state.order.pop_oldest() else {
                break;
            };
            if let Some(entry) = state.entries.remove(&victim) {
                state.used_bytes -= entry.size_bytes;
            }
            evicted += 1;
        }
        state.stats.record_evictions(evicted);

        let entry = CacheEntry::new(key, value, now);
        state.used_bytes += entry.size_bytes;
        state.order.push(now, key.to_owned());
        state.entries.insert(key.to_owned(), entry);

        state.debug_check(self.capacity_bytes);
        Ok(evicted)
    }

    // == Delete ==
    /// Removes `key`. Returns false if it was not present.
    pub fn delete(&self, key: &str) -> bool {
        let mut guard = self.state.lock();
        let found = guard.remove(key);
        guard.debug_check(self.capacity_bytes);
        found
    }

    // == Evict Expired ==
    /// Removes every entry whose age at `now` is at least `ttl`.
    ///
    /// Returns the number of entries removed.
    pub fn evict_expired(&self, now: Instant, ttl: Duration) -> usize {
        // Nothing can be older than the clock itself
        let Some(cutoff) = now.checked_sub(ttl) else {
            return 0;
        };

        let mut guard = self.state.lock();
        let state = &mut *guard;

        let mut removed = 0;
        while let Some((_, key)) = state.order.pop_stored_before(cutoff) {
            if let Some(entry) = state.entries.remove(&key) {
                state.used_bytes -= entry.size_bytes;
            }
            removed += 1;
        }
        state.stats.record_expirations(removed);

        state.debug_check(self.capacity_bytes);
        removed
    }

    // == Stats ==
    /// Returns a snapshot of this shard's counters and usage.
    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        let mut stats = state.stats.clone();
        stats.total_entries = state.entries.len();
        stats.used_bytes = state.used_bytes;
        stats.capacity_bytes = self.capacity_bytes;
        stats
    }

    // == Length ==
    /// Returns the number of entries, expired or not.
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    // == Is Empty ==
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }

    /// Bytes currently charged against capacity.
    pub fn used_bytes(&self) -> usize {
        self.state.lock().used_bytes
    }

    /// Capacity ceiling in bytes.
    pub fn capacity_bytes(&self) -> usize {
        self.capacity_bytes
    }
}

impl ShardState {
    /// Drops `key` from the map and the queue, releasing its bytes.
    fn remove(&mut self, key: &str) -> bool {
        match self.entries.remove(key) {
            Some(entry) => {
                self.order.remove(entry.stored_at, key);
                self.used_bytes -= entry.size_bytes;
                true
            }
            None => false,
        }
    }

    /// Asserts the accounting invariants in debug builds.
    fn debug_check(&self, capacity_bytes: usize) {
        if cfg!(debug_assertions) {
            let sum: usize = self.entries.values().map(|e| e.size_bytes).sum();
            assert_eq!(self.used_bytes, sum, "used_bytes out of sync with entries");
            assert_eq!(
                self.order.len(),
                self.entries.len(),
                "eviction queue out of sync with entries"
            );
            assert!(self.used_bytes <= capacity_bytes, "shard over capacity");
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(180);

    fn bytes(s: &str) -> Bytes {
        Bytes::copy_from_slice(s.as_bytes())
    }

    #[test]
    fn test_shard_set_and_get() {
        let shard = Shard::new(1024);
        let now = Instant::now();

        shard.set("key1", bytes("value1"), now).unwrap();

        assert_eq!(shard.get("key1", now, TTL), Some(bytes("value1")));
        assert_eq!(shard.len(), 1);
        assert_eq!(shard.used_bytes(), 4 + 6);
    }

    #[test]
    fn test_shard_get_nonexistent() {
        let shard = Shard::new(1024);
        assert!(shard.get("missing", Instant::now(), TTL).is_none());
        assert_eq!(shard.stats().misses, 1);
    }

    #[test]
    fn test_shard_overwrite_recomputes_usage() {
        let shard = Shard::new(1024);
        let now = Instant::now();

        shard.set("key1", bytes("a long first value"), now).unwrap();
        shard.set("key1", bytes("short"), now + Duration::from_millis(1)).unwrap();

        assert_eq!(shard.len(), 1);
        assert_eq!(shard.used_bytes(), 4 + 5);
        assert_eq!(shard.get("key1", now, TTL), Some(bytes("short")));
    }

    #[test]
    fn test_shard_delete() {
        let shard = Shard::new(1024);
        let now = Instant::now();

        shard.set("key1", bytes("value1"), now).unwrap();

        assert!(shard.delete("key1"));
        assert!(!shard.delete("key1"));
        assert_eq!(shard.used_bytes(), 0);
        assert!(shard.is_empty());
    }

    #[test]
    fn test_shard_get_hides_expired_entry_until_sweep() {
        let shard = Shard::new(1024);
        let now = Instant::now();

        shard.set("key1", bytes("value1"), now).unwrap();
        let later = now + TTL;

        assert!(shard.get("key1", later, TTL).is_none());
        // Still resident until the janitor runs
        assert_eq!(shard.len(), 1);

        assert_eq!(shard.evict_expired(later, TTL), 1);
        assert_eq!(shard.len(), 0);
        assert_eq!(shard.used_bytes(), 0);
        assert_eq!(shard.stats().expirations, 1);
    }

    #[test]
    fn test_shard_evict_expired_keeps_young_entries() {
        let shard = Shard::new(1024);
        let now = Instant::now();

        shard.set("old", bytes("v"), now).unwrap();
        shard.set("young", bytes("v"), now + Duration::from_secs(100)).unwrap();

        let removed = shard.evict_expired(now + Duration::from_secs(200), TTL);

        assert_eq!(removed, 1);
        assert!(shard.get("old", now + Duration::from_secs(200), TTL).is_none());
        assert!(shard.get("young", now + Duration::from_secs(200), TTL).is_some());
    }

    #[test]
    fn test_shard_overwrite_resets_age() {
        let shard = Shard::new(1024);
        let now = Instant::now();

        shard.set("key1", bytes("v1"), now).unwrap();
        shard.set("key1", bytes("v2"), now + Duration::from_secs(100)).unwrap();

        assert_eq!(shard.evict_expired(now + TTL, TTL), 0);
        assert_eq!(shard.get("key1", now + TTL, TTL), Some(bytes("v2")));
    }

    #[test]
    fn test_shard_capacity_eviction_oldest_first() {
        // Each entry is 2 + 8 = 10 bytes; room for three
        let shard = Shard::new(30);
        let now = Instant::now();

        shard.set("k1", bytes("aaaaaaaa"), now).unwrap();
        shard.set("k2", bytes("bbbbbbbb"), now + Duration::from_millis(1)).unwrap();
        shard.set("k3", bytes("cccccccc"), now + Duration::from_millis(2)).unwrap();

        let evicted = shard.set("k4", bytes("dddddddd"), now + Duration::from_millis(3)).unwrap();

        assert_eq!(evicted, 1);
        assert!(shard.get("k1", now, TTL).is_none());
        assert!(shard.get("k2", now, TTL).is_some());
        assert!(shard.get("k4", now, TTL).is_some());
        assert!(shard.used_bytes() <= shard.capacity_bytes());
        assert_eq!(shard.stats().evictions, 1);
    }

    #[test]
    fn test_shard_capacity_eviction_ties_broken_by_key() {
        let shard = Shard::new(30);
        let now = Instant::now();

        shard.set("kc", bytes("cccccccc"), now).unwrap();
        shard.set("ka", bytes("aaaaaaaa"), now).unwrap();
        shard.set("kb", bytes("bbbbbbbb"), now).unwrap();

        shard.set("kd", bytes("dddddddd"), now).unwrap();

        assert!(shard.get("ka", now, TTL).is_none());
        assert!(shard.get("kb", now, TTL).is_some());
        assert!(shard.get("kc", now, TTL).is_some());
    }

    #[test]
    fn test_shard_large_entry_evicts_several() {
        let shard = Shard::new(30);
        let now = Instant::now();

        shard.set("k1", bytes("aaaaaaaa"), now).unwrap();
        shard.set("k2", bytes("bbbbbbbb"), now + Duration::from_millis(1)).unwrap();
        shard.set("k3", bytes("cccccccc"), now + Duration::from_millis(2)).unwrap();

        // 2 + 18 = 20 bytes needs two slots
        let evicted = shard
            .set("k4", bytes("dddddddddddddddddd"), now + Duration::from_millis(3))
            .unwrap();

        assert_eq!(evicted, 2);
        assert_eq!(shard.len(), 2);
        assert!(shard.get("k3", now, TTL).is_some());
        assert_eq!(shard.used_bytes(), 30);
    }

    #[test]
    fn test_shard_rejects_entry_larger_than_capacity() {
        let shard = Shard::new(10);
        let now = Instant::now();

        shard.set("k1", bytes("aaaa"), now).unwrap();
        let result = shard.set("k1", bytes("way too large"), now);

        assert!(matches!(result, Err(CacheError::Oversize { .. })));
        // Previous value untouched
        assert_eq!(shard.get("k1", now, TTL), Some(bytes("aaaa")));
    }
}
