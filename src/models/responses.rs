//! Response DTOs for the record service API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::{Deserialize, Serialize};

use crate::cache::CacheStats;
use crate::models::Pokemon;

/// Envelope returned by every pokemon route, on success and failure alike.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PokemonResponse {
    /// The record, empty when the request failed before one was found
    #[serde(flatten)]
    pub pokemon: Pokemon,
    /// Correlation id of this request
    #[serde(rename = "RequestID")]
    pub request_id: String,
    /// Time the request started, RFC 3339
    #[serde(rename = "RequestTS")]
    pub request_ts: String,
    /// `Success` or a description of the failure
    #[serde(rename = "RespMessage")]
    pub resp_message: String,
    /// HTTP status code
    #[serde(rename = "RespCode")]
    pub resp_code: u16,
    /// Time spent handling the request
    #[serde(rename = "Latency")]
    pub latency: String,
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of capacity evictions
    pub evictions: u64,
    /// Number of entries removed by the expiry sweep
    pub expirations: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    /// Bytes charged against capacity
    pub used_bytes: usize,
    /// Total capacity in bytes
    pub capacity_bytes: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        let hit_rate = stats.hit_rate();
        Self {
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
            total_entries: stats.total_entries,
            used_bytes: stats.used_bytes,
            capacity_bytes: stats.capacity_bytes,
            hit_rate,
        }
    }
}
