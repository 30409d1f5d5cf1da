//! Pokemon Service - record store over a sharded in-memory cache
//!
//! Records are stored under their id and their name, expire after a fixed
//! TTL, and are evicted oldest-first when a shard runs out of room.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod seed;
pub mod server;
pub mod tasks;

pub use api::AppState;
pub use cache::{Cache, CacheConfig};
pub use config::Config;
pub use server::serve;
