//! Request and Response models for the record service API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies, and the
//! record encoding stored in the cache.

pub mod pokemon;
pub mod responses;

// Re-export commonly used types
pub use pokemon::{Pokemon, PokemonRequest, MAX_KEY_LENGTH};
pub use responses::{PokemonResponse, StatsResponse};
