//! API Handlers
//!
//! HTTP request handlers translating each route into cache operations.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::api::envelope::ResponseFrame;
use crate::cache::Cache;
use crate::config::Config;
use crate::error::{ApiError, CacheError};
use crate::models::{Pokemon, PokemonRequest, PokemonResponse, StatsResponse};

/// Application state shared across all handlers.
///
/// The cache locks per shard internally, so it is shared without an outer lock.
#[derive(Clone)]
pub struct AppState {
    /// Shared cache
    pub cache: Arc<Cache>,
    /// Deadline applied to every request
    pub request_timeout: Duration,
}

impl AppState {
    /// Creates a new AppState around the given cache.
    ///
    /// Uses the request timeout of the default [`Config`].
    pub fn new(cache: Cache) -> Self {
        Self {
            cache: Arc::new(cache),
            request_timeout: Config::default().request_timeout(),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Builds the cache (and starts its janitor) from the Config.
    pub fn from_config(config: &Config) -> Result<Self, CacheError> {
        let cache = Cache::new(config.cache_config())?;
        Ok(Self {
            cache: Arc::new(cache),
            request_timeout: config.request_timeout(),
        })
    }
}

type Envelope = (StatusCode, Json<PokemonResponse>);

/// Handler for GET /pokemon-service/getByID/:id
pub async fn get_by_id(State(state): State<AppState>, Path(id): Path<String>) -> Envelope {
    let frame = ResponseFrame::start();
    frame.respond(lookup(&state.cache, "Id", &id))
}

/// Handler for GET /pokemon-service/getByName/:name
pub async fn get_by_name(State(state): State<AppState>, Path(name): Path<String>) -> Envelope {
    let frame = ResponseFrame::start();
    frame.respond(lookup(&state.cache, "Name", &name))
}

/// Handler for DELETE /pokemon-service/:id
///
/// Removes the id key only; the name key keeps its copy until it expires.
pub async fn delete_by_id(State(state): State<AppState>, Path(id): Path<String>) -> Envelope {
    let frame = ResponseFrame::start();
    let outcome = lookup(&state.cache, "Id", &id).and_then(|pokemon| {
        if state.cache.delete(&id) {
            info!(id = %id, "Deleted record");
            Ok(pokemon)
        } else {
            Err(ApiError::NotFound(format!(
                "Unable to get data from cache for Id to delete:{}",
                id
            )))
        }
    });
    frame.respond(outcome)
}

/// Handler for POST /pokemon-service/Add
///
/// Stores the same serialized record under its name and under its id.
pub async fn add_pokemon(State(state): State<AppState>, body: Bytes) -> Envelope {
    let request: PokemonRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(err) => {
            return ResponseFrame::start()
                .respond(Err(ApiError::InvalidRequest(format!("Invalid Json request: {}", err))))
        }
    };

    let frame = if request.request_id.is_empty() {
        ResponseFrame::start()
    } else {
        ResponseFrame::with_request_id(request.request_id.clone())
    };
    frame.respond(store(&state.cache, request))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.cache.stats()))
}

/// Handler for GET /health-check
pub async fn health_handler() -> &'static str {
    "Health Check success"
}

/// Fetches and decodes the record stored under `key`.
fn lookup(cache: &Cache, label: &str, key: &str) -> Result<Pokemon, ApiError> {
    if key.trim().is_empty() {
        return Err(ApiError::Unprocessable(format!(
            "{} is expected in endpoint",
            label
        )));
    }

    let bytes = cache.get(key).ok_or_else(|| {
        ApiError::NotFound(format!(
            "Unable to get data from cache for {}:{}",
            label, key
        ))
    })?;

    let stored: PokemonRequest = serde_json::from_slice(&bytes).map_err(|err| {
        ApiError::Decode(format!(
            "Unable to decode cached data for {}:{}: {}",
            label, key, err
        ))
    })?;
    Ok(stored.pokemon)
}

/// Writes `request` under its name and its id.
fn store(cache: &Cache, request: PokemonRequest) -> Result<Pokemon, ApiError> {
    if let Some(message) = request.validate() {
        return Err(ApiError::Unprocessable(message));
    }

    let payload = Bytes::from(
        serde_json::to_vec(&request).map_err(|err| ApiError::InvalidRequest(err.to_string()))?,
    );

    cache.set_all(&[request.pokemon.name.as_str(), request.pokemon.id.as_str()], payload)?;

    info!(id = %request.pokemon.id, name = %request.pokemon.name, "Stored record");
    Ok(request.pokemon)
}
