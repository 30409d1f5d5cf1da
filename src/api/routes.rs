//! API Routes
//!
//! Configures the Axum router with all record service endpoints.

use std::time::Duration;

use axum::{
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use super::envelope::ResponseFrame;
use super::handlers::{
    add_pokemon, delete_by_id, get_by_id, get_by_name, health_handler, stats_handler, AppState,
};
use crate::error::ApiError;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /health-check` - Liveness probe
/// - `GET /pokemon-service/getByID/:id` - Fetch a record by id
/// - `GET /pokemon-service/getByName/:name` - Fetch a record by name
/// - `DELETE /pokemon-service/:id` - Delete the id key of a record
/// - `POST /pokemon-service/Add` - Store a record under its id and name
/// - `GET /stats` - Cache statistics
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
/// - Timeout: Fails requests that exceed the configured deadline; the
///   pokemon routes report it inside the response envelope
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let pokemon = Router::new()
        .route("/pokemon-service/getByID/:id", get(get_by_id))
        .route("/pokemon-service/getByName/:name", get(get_by_name))
        .route("/pokemon-service/Add", post(add_pokemon))
        .route("/pokemon-service/:id", delete(delete_by_id));

    let service = Router::new()
        .route("/health-check", get(health_handler))
        .route("/stats", get(stats_handler))
        .route_layer(TimeoutLayer::new(state.request_timeout));

    Router::new()
        .merge(with_enveloped_timeout(pokemon, state.request_timeout))
        .merge(service)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Applies the request deadline to `router`, answering late requests with
/// the pokemon response envelope instead of an empty body.
pub fn with_enveloped_timeout<S>(router: Router<S>, timeout: Duration) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .route_layer(TimeoutLayer::new(timeout))
        .route_layer(middleware::map_response(frame_timeout))
}

/// Rewrites the bare 408 produced by the timeout layer into an envelope.
async fn frame_timeout(response: Response) -> Response {
    if response.status() != StatusCode::REQUEST_TIMEOUT {
        return response;
    }
    ResponseFrame::start()
        .respond(Err(ApiError::Timeout(
            "Request timed out before completion".to_string(),
        )))
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{Cache, CacheConfig};
    use axum::{body::Body, http::Request};
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        let config = CacheConfig {
            shard_count: 4,
            cleanup_interval: Duration::ZERO,
            ..CacheConfig::default()
        };
        create_router(AppState::new(Cache::new(config).unwrap()))
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health-check")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(Request::builder().uri("/stats").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_add_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/pokemon-service/Add")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"ID":"PK1","Name":"Chespin"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_get_not_found() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/pokemon-service/getByID/nonexistent")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_timeout_is_reported_in_envelope() {
        let slow = Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_millis(500)).await;
                "late"
            }),
        );
        let app = with_enveloped_timeout(slow, Duration::from_millis(20));

        let response = app
            .oneshot(Request::builder().uri("/slow").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["RespCode"], 408);
        assert_eq!(json["RespMessage"], "Request timed out before completion");
        assert!(json["RequestID"].as_str().is_some_and(|id| !id.is_empty()));
    }

    #[tokio::test]
    async fn test_wrong_method_is_rejected() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/pokemon-service/Add")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
