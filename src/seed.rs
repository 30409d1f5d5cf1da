//! Sample Data
//!
//! Records loaded into the cache at startup so a fresh server has something to serve.

use anyhow::Result;
use bytes::Bytes;

use crate::cache::Cache;
use crate::models::{Pokemon, PokemonRequest};

/// The built-in sample records, ids `PK10001` through `PK10009`.
pub fn sample_pokemon() -> Vec<Pokemon> {
    [
        ("Chespin", "TT", "20.9", "30.9"),
        ("Fennekin", "PP", "10.9", "31.1"),
        ("Froakie", "JJ", "30.9", "32.0"),
        ("Sylveon", "KK", "60.9", "34.8"),
        ("Xerneas", "UU", "80.9", "31.5"),
        ("Yveltal", "LL", "50.9", "37.3"),
        ("Zygarde", "WW", "10.9", "33.9"),
        ("PokemonX", "QQ", "90.9", "31.1"),
        ("PokemonY", "WY", "20.9", "33.2"),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (name, kind, height, weight))| {
        Pokemon::new(format!("PK{}", 10001 + i), name, kind, height, weight, "Eat&Sleep")
    })
    .collect()
}

/// Stores every sample record under its name and its id.
///
/// Returns the number of records loaded.
pub fn load_sample_data(cache: &Cache) -> Result<usize> {
    let pokemon = sample_pokemon();
    for record in &pokemon {
        let payload = Bytes::from(serde_json::to_vec(&PokemonRequest::from(record.clone()))?);
        cache.set_all(&[record.name.as_str(), record.id.as_str()], payload)?;
    }
    Ok(pokemon.len())
}
