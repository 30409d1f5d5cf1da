//! Response Envelope
//!
//! Frames every pokemon route's outcome with a correlation id, start time,
//! status and latency.

use std::time::Instant;

use axum::{http::StatusCode, Json};
use chrono::{DateTime, SecondsFormat, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{Pokemon, PokemonResponse};

/// Message carried by every successful response
pub const SUCCESS_MESSAGE: &str = "Success";

/// Timing and correlation data captured when a request starts.
#[derive(Debug, Clone)]
pub struct ResponseFrame {
    request_id: String,
    started: Instant,
    started_at: DateTime<Utc>,
}

impl ResponseFrame {
    /// Starts a frame with a freshly generated correlation id.
    pub fn start() -> Self {
        Self::with_request_id(Uuid::new_v4().to_string())
    }

    /// Starts a frame that reuses a caller-supplied correlation id.
    pub fn with_request_id(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            started: Instant::now(),
            started_at: Utc::now(),
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Turns a handler outcome into the status and JSON envelope.
    pub fn respond(self, outcome: Result<Pokemon, ApiError>) -> (StatusCode, Json<PokemonResponse>) {
        let (status, pokemon, message) = match outcome {
            Ok(pokemon) => (StatusCode::OK, pokemon, SUCCESS_MESSAGE.to_string()),
            Err(err) => {
                debug!(request_id = %self.request_id, error = %err, "Request failed");
                (err.status(), Pokemon::default(), err.to_string())
            }
        };

        let body = PokemonResponse {
            pokemon,
            request_id: self.request_id,
            request_ts: self.started_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            resp_message: message,
            resp_code: status.as_u16(),
            latency: format!("{:?}", self.started.elapsed()),
        };

        (status, Json(body))
    }
}
