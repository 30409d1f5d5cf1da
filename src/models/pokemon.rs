//! Pokemon record DTOs
//!
//! The record a client creates, and the exact bytes stored in the cache under
//! both its id and its name.

use serde::{Deserialize, Serialize};

/// Maximum allowed length of an id or name, in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// A pokemon record. All fields are free text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pokemon {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "Height")]
    pub height: String,
    #[serde(rename = "Weight")]
    pub weight: String,
    #[serde(rename = "Abilities")]
    pub abilities: String,
}

impl Pokemon {
    /// Convenience constructor used by the seed data and tests.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: impl Into<String>,
        height: impl Into<String>,
        weight: impl Into<String>,
        abilities: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: kind.into(),
            height: height.into(),
            weight: weight.into(),
            abilities: abilities.into(),
        }
    }
}

/// Request body for POST /pokemon-service/Add.
///
/// Serialized as-is into the cache, so the optional request fields travel
/// with the stored record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonRequest {
    #[serde(flatten)]
    pub pokemon: Pokemon,
    /// Caller-supplied correlation id
    #[serde(rename = "RequestID", default, skip_serializing_if = "String::is_empty")]
    pub request_id: String,
    /// Caller-supplied request timestamp
    #[serde(rename = "RequestTS", default, skip_serializing_if = "String::is_empty")]
    pub request_ts: String,
}

impl PokemonRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        for (field, value) in [("ID", &self.pokemon.id), ("Name", &self.pokemon.name)] {
            if value.trim().is_empty() {
                return Some(format!("{} is expected in request", field));
            }
            if value.len() > MAX_KEY_LENGTH {
                return Some(format!(
                    "{} exceeds maximum length of {} characters",
                    field, MAX_KEY_LENGTH
                ));
            }
        }
        None
    }
}

impl From<Pokemon> for PokemonRequest {
    fn from(pokemon: Pokemon) -> Self {
        Self {
            pokemon,
            ..Self::default()
        }
    }
}
