//! Cache Store Module
//!
//! Main cache engine: hashes keys onto independently locked shards, enforces
//! the per-entry limit, and owns the background janitor.

use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use tracing::{debug, info};

use crate::cache::entry::entry_size;
use crate::cache::{CacheStats, Shard};
use crate::error::{CacheError, Result};
use crate::tasks::Janitor;

// == Cache Config ==
/// Construction parameters for [`Cache`]. Immutable once the cache exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Number of shards; must be a power of two
    pub shard_count: usize,
    /// Lifetime of every entry
    pub ttl: Duration,
    /// Period of the expiry sweep; zero disables the janitor
    pub cleanup_interval: Duration,
    /// Ceiling over all shards in bytes; zero means unbounded
    pub hard_max_total_bytes: usize,
    /// Largest value accepted by `set`, in bytes
    pub max_entry_size: usize,
}

impl CacheConfig {
    /// Capacity of one shard: the total ceiling split evenly, rounded up.
    pub fn shard_capacity(&self) -> usize {
        if self.hard_max_total_bytes == 0 {
            usize::MAX
        } else {
            self.hard_max_total_bytes.div_ceil(self.shard_count)
        }
    }

    // == Validate ==
    /// Checks the parameters without building anything.
    pub fn validate(&self) -> Result<()> {
        if self.shard_count == 0 || !self.shard_count.is_power_of_two() {
            return Err(CacheError::Config(format!(
                "shard count must be a power of two, got {}",
                self.shard_count
            )));
        }
        if self.ttl.is_zero() {
            return Err(CacheError::Config("ttl must be positive".to_string()));
        }
        if self.max_entry_size == 0 {
            return Err(CacheError::Config(
                "max entry size must be positive".to_string(),
            ));
        }
        let shard_capacity = self.shard_capacity();
        if self.max_entry_size > shard_capacity {
            return Err(CacheError::Config(format!(
                "max entry size {} exceeds shard capacity {}",
                self.max_entry_size, shard_capacity
            )));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            shard_count: 1024,
            ttl: Duration::from_secs(180),
            cleanup_interval: Duration::from_secs(5),
            hard_max_total_bytes: 10 * 1024 * 1024,
            max_entry_size: 10 * 1024,
        }
    }
}

// == Shard Set ==
/// The shards plus the immutable settings the sweep needs.
///
/// Shared between the cache and its janitor.
#[derive(Debug)]
pub struct ShardSet {
    shards: Box<[Shard]>,
    mask: usize,
    ttl: Duration,
}

impl ShardSet {
    pub(crate) fn new(config: &CacheConfig) -> Self {
        let capacity = config.shard_capacity();
        let shards = (0..config.shard_count)
            .map(|_| Shard::new(capacity))
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Self {
            shards,
            mask: config.shard_count - 1,
            ttl: config.ttl,
        }
    }

    /// Index of the shard owning `key`.
    pub fn index_for(&self, key: &str) -> usize {
        (seahash::hash(key.as_bytes()) as usize) & self.mask
    }

    /// The shard owning `key`.
    pub fn shard_for(&self, key: &str) -> &Shard {
        &self.shards[self.index_for(key)]
    }

    /// All shards in index order.
    pub fn shards(&self) -> &[Shard] {
        &self.shards
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // == Sweep ==
    /// Evicts expired entries from every shard, one lock at a time.
    ///
    /// Returns the number of entries removed.
    pub fn sweep(&self, now: Instant) -> usize {
        self.shards
            .iter()
            .map(|shard| shard.evict_expired(now, self.ttl))
            .sum()
    }
}

// == Cache ==
/// Sharded TTL cache with byte-bounded shards.
///
/// Share it by reference (`Arc<Cache>`); every method takes `&self`.
#[derive(Debug)]
pub struct Cache {
    shards: Arc<ShardSet>,
    max_entry_size: usize,
    janitor: Option<Janitor>,
}

impl Cache {
    // == Constructor ==
    /// Builds the shards and starts the janitor.
    ///
    /// The janitor is a Tokio task, so a runtime must be current unless
    /// `cleanup_interval` is zero.
    pub fn new(config: CacheConfig) -> Result<Self> {
        config.validate()?;

        let shards = Arc::new(ShardSet::new(&config));

        let janitor = if config.cleanup_interval.is_zero() {
            debug!("Cleanup interval is zero, expiry sweep disabled");
            None
        } else {
            Some(Janitor::start(shards.clone(), config.cleanup_interval)?)
        };

        info!(
            shard_count = config.shard_count,
            shard_capacity = config.shard_capacity(),
            ttl_secs = config.ttl.as_secs_f64(),
            "Cache initialized"
        );

        Ok(Self {
            shards,
            max_entry_size: config.max_entry_size,
            janitor,
        })
    }

    // == Get ==
    /// Returns the live value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<Bytes> {
        self.shards
            .shard_for(key)
            .get(key, Instant::now(), self.shards.ttl())
    }

    // == Set ==
    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// Rejects, without touching the cache, anything [`Cache::admit`] rejects.
    pub fn set(&self, key: &str, value: Bytes) -> Result<()> {
        self.admit(key, &value)?;

        let evicted = self.shards.shard_for(key).set(key, value, Instant::now())?;
        if evicted > 0 {
            debug!(key, evicted, "Shard full, evicted oldest entries");
        }
        Ok(())
    }

    // == Set All ==
    /// Stores the same `value` under every key in `keys`.
    ///
    /// Every key is admitted before anything is written, so an `Oversize`
    /// rejection leaves the cache untouched.
    pub fn set_all(&self, keys: &[&str], value: Bytes) -> Result<()> {
        for key in keys {
            self.admit(key, &value)?;
        }
        for key in keys {
            self.set(key, value.clone())?;
        }
        Ok(())
    }

    // == Admit ==
    /// Checks that `value` stored under `key` would be accepted by `set`.
    ///
    /// The value must fit the per-entry limit and the key plus value must fit
    /// the owning shard.
    pub fn admit(&self, key: &str, value: &[u8]) -> Result<()> {
        if value.len() > self.max_entry_size {
            return Err(CacheError::Oversize {
                size: value.len(),
                max: self.max_entry_size,
            });
        }

        let size = entry_size(key, value);
        let capacity = self.shards.shard_for(key).capacity_bytes();
        if size > capacity {
            return Err(CacheError::Oversize {
                size,
                max: capacity,
            });
        }
        Ok(())
    }

    // == Delete ==
    /// Removes `key`. Returns false if it was not present.
    pub fn delete(&self, key: &str) -> bool {
        self.shards.shard_for(key).delete(key)
    }

    // == Stats ==
    /// Sums the per-shard statistics.
    pub fn stats(&self) -> CacheStats {
        self.shards
            .shards()
            .iter()
            .fold(CacheStats::new(), |mut total, shard| {
                total.merge(&shard.stats());
                total
            })
    }

    // == Cleanup Expired ==
    /// Runs one expiry sweep on the calling thread.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&self) -> usize {
        self.shards.sweep(Instant::now())
    }

    // == Shutdown ==
    /// Stops the janitor and waits for it to finish its current sweep.
    pub async fn shutdown(&self) {
        if let Some(janitor) = &self.janitor {
            janitor.stop().await;
        }
    }

    // == Length ==
    /// Returns the number of resident entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.shards.shards().iter().map(Shard::len).sum()
    }

    // == Is Empty ==
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The shards, for inspection.
    pub fn shard_set(&self) -> &ShardSet {
        &self.shards
    }
}
