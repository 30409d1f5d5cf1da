//! API Module
//!
//! HTTP handlers and routing for the record service REST API.
//!
//! # Endpoints
//! - `GET /health-check` - Liveness probe
//! - `GET /pokemon-service/getByID/:id` - Fetch a record by id
//! - `GET /pokemon-service/getByName/:name` - Fetch a record by name
//! - `DELETE /pokemon-service/:id` - Delete the id key of a record
//! - `POST /pokemon-service/Add` - Store a record under its id and name
//! - `GET /stats` - Cache statistics

pub mod envelope;
pub mod handlers;
pub mod routes;

pub use envelope::ResponseFrame;
pub use handlers::*;
pub use routes::create_router;
