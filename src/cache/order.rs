//! Eviction Queue Module
//!
//! Orders a shard's keys by insertion time for capacity and expiry eviction.

use std::collections::BTreeSet;
use std::time::Instant;

// == Eviction Queue ==
/// Tracks insertion order for oldest-first eviction.
///
/// Keys are ordered by `(stored_at, key)`:
/// - First = oldest write (next eviction candidate)
/// - Last = newest write
///
/// Equal timestamps fall back to byte order of the key, so eviction order is
/// reproducible.
#[derive(Debug, Default)]
pub struct EvictionQueue {
    order: BTreeSet<(Instant, String)>,
}

impl EvictionQueue {
    // == Constructor ==
    /// Creates a new empty queue.
    pub fn new() -> Self {
        Self {
            order: BTreeSet::new(),
        }
    }

    // == Push ==
    /// Records a write of `key` at `stored_at`.
    pub fn push(&mut self, stored_at: Instant, key: String) {
        self.order.insert((stored_at, key));
    }

    // == Remove ==
    /// Forgets the write of `key` at `stored_at`.
    ///
    /// Returns true if it was tracked.
    pub fn remove(&mut self, stored_at: Instant, key: &str) -> bool {
        // BTreeSet lookups need an owned tuple
        self.order.remove(&(stored_at, key.to_owned()))
    }

    // == Pop Oldest ==
    /// Returns and removes the oldest key.
    ///
    /// Returns None if the queue is empty.
    pub fn pop_oldest(&mut self) -> Option<(Instant, String)> {
        self.order.pop_first()
    }

    // == Pop Older Than ==
    /// Returns and removes the oldest key if it was stored at or before `cutoff`.
    pub fn pop_stored_before(&mut self, cutoff: Instant) -> Option<(Instant, String)> {
        match self.order.first() {
            Some((stored_at, _)) if *stored_at <= cutoff => self.order.pop_first(),
            _ => None,
        }
    }

    // == Peek Oldest ==
    /// Returns the oldest key without removing it.
    #[allow(dead_code)]
    pub fn peek_oldest(&self) -> Option<&(Instant, String)> {
        self.order.first()
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    // == Is Empty ==
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_queue_new() {
        let queue = EvictionQueue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn test_pop_oldest_follows_insertion_time() {
        let base = Instant::now();
        let mut queue = EvictionQueue::new();

        queue.push(base + Duration::from_millis(2), "key3".to_string());
        queue.push(base, "key1".to_string());
        queue.push(base + Duration::from_millis(1), "key2".to_string());

        assert_eq!(queue.pop_oldest().map(|(_, k)| k), Some("key1".to_string()));
        assert_eq!(queue.pop_oldest().map(|(_, k)| k), Some("key2".to_string()));
        assert_eq!(queue.pop_oldest().map(|(_, k)| k), Some("key3".to_string()));
        assert!(queue.pop_oldest().is_none());
    }

    #[test]
    fn test_equal_timestamps_break_ties_by_key() {
        let now = Instant::now();
        let mut queue = EvictionQueue::new();

        queue.push(now, "b".to_string());
        queue.push(now, "c".to_string());
        queue.push(now, "a".to_string());

        assert_eq!(queue.peek_oldest().map(|(_, k)| k.as_str()), Some("a"));
        queue.pop_oldest();
        assert_eq!(queue.peek_oldest().map(|(_, k)| k.as_str()), Some("b"));
    }

    #[test]
    fn test_remove() {
        let now = Instant::now();
        let mut queue = EvictionQueue::new();

        queue.push(now, "key1".to_string());
        queue.push(now, "key2".to_string());

        assert!(queue.remove(now, "key1"));
        assert!(!queue.remove(now, "key1"));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_pop_stored_before_respects_cutoff() {
        let base = Instant::now();
        let mut queue = EvictionQueue::new();

        queue.push(base, "old".to_string());
        queue.push(base + Duration::from_secs(10), "new".to_string());

        let cutoff = base + Duration::from_secs(5);
        assert_eq!(
            queue.pop_stored_before(cutoff).map(|(_, k)| k),
            Some("old".to_string())
        );
        assert!(queue.pop_stored_before(cutoff).is_none());
        assert_eq!(queue.len(), 1);
    }
}
