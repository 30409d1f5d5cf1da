//! Cache Module
//!
//! Sharded in-memory cache with TTL expiration and byte-bounded, oldest-first
//! capacity eviction.

mod entry;
mod order;
mod shard;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use order::EvictionQueue;
pub use shard::Shard;
pub use stats::CacheStats;
pub use store::{Cache, CacheConfig, ShardSet};
