//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::CacheConfig;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP bind address
    pub server_host: String,
    /// HTTP server port
    pub server_port: u16,
    /// Number of cache shards (power of two)
    pub shard_count: usize,
    /// Entry lifetime in seconds
    pub ttl_secs: u64,
    /// Expiry sweep interval in seconds, 0 disables the sweep
    pub cleanup_interval_secs: u64,
    /// Total cache ceiling in MiB, 0 means unbounded
    pub hard_max_cache_size_mb: usize,
    /// Largest accepted record in bytes
    pub max_entry_size: usize,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Grace period for shutdown in seconds
    pub shutdown_timeout_secs: u64,
    /// Load the sample records at startup
    pub seed_sample_data: bool,
    /// Optional log file, in addition to stdout
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_HOST` - Bind address (default: 127.0.0.1)
    /// - `SERVER_PORT` - HTTP server port (default: 8000)
    /// - `SHARD_COUNT` - Cache shards (default: 1024)
    /// - `TTL_SECS` - Entry lifetime in seconds (default: 180)
    /// - `CLEANUP_INTERVAL_SECS` - Sweep frequency in seconds (default: 5)
    /// - `HARD_MAX_CACHE_SIZE_MB` - Total cache ceiling in MiB (default: 10)
    /// - `MAX_ENTRY_SIZE` - Per-record limit in bytes (default: 10240)
    /// - `REQUEST_TIMEOUT_SECS` - Per-request timeout (default: 5)
    /// - `SHUTDOWN_TIMEOUT_SECS` - Shutdown grace period (default: 5)
    /// - `SEED_SAMPLE_DATA` - Load sample records (default: true)
    /// - `LOG_FILE` - Also write logs to this file (default: unset)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_host: env::var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            shard_count: parse_var("SHARD_COUNT").unwrap_or(defaults.shard_count),
            ttl_secs: parse_var("TTL_SECS").unwrap_or(defaults.ttl_secs),
            cleanup_interval_secs: parse_var("CLEANUP_INTERVAL_SECS")
                .unwrap_or(defaults.cleanup_interval_secs),
            hard_max_cache_size_mb: parse_var("HARD_MAX_CACHE_SIZE_MB")
                .unwrap_or(defaults.hard_max_cache_size_mb),
            max_entry_size: parse_var("MAX_ENTRY_SIZE").unwrap_or(defaults.max_entry_size),
            request_timeout_secs: parse_var("REQUEST_TIMEOUT_SECS")
                .unwrap_or(defaults.request_timeout_secs),
            shutdown_timeout_secs: parse_var("SHUTDOWN_TIMEOUT_SECS")
                .unwrap_or(defaults.shutdown_timeout_secs),
            seed_sample_data: parse_var("SEED_SAMPLE_DATA").unwrap_or(defaults.seed_sample_data),
            log_file: env::var("LOG_FILE")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        }
    }

    /// Cache parameters derived from this configuration.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            shard_count: self.shard_count,
            ttl: Duration::from_secs(self.ttl_secs),
            cleanup_interval: Duration::from_secs(self.cleanup_interval_secs),
            hard_max_total_bytes: self.hard_max_cache_size_mb.saturating_mul(1024 * 1024),
            max_entry_size: self.max_entry_size,
        }
    }

    /// Address the server binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: "127.0.0.1".to_string(),
            server_port: 8000,
            shard_count: 1024,
            ttl_secs: 180,
            cleanup_interval_secs: 5,
            hard_max_cache_size_mb: 10,
            max_entry_size: 10 * 1024,
            request_timeout_secs: 5,
            shutdown_timeout_secs: 5,
            seed_sample_data: true,
            log_file: None,
        }
    }
}

/// Reads and parses an environment variable, ignoring unset or malformed values.
fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
