//! REST API module using Axum
//!
//! Provides the HTTP surface of the advisory core:
//! - /api/v1 endpoints with a consistent response envelope
//! - optional bearer-token verification on the /api/v1 surface
//! - liveness probe at /health
//!
//! The dashboard itself is a separate deployment; this service only speaks
//! JSON.

pub mod envelope;
pub mod handlers;
pub mod middleware;
mod routes;

pub use handlers::AdvisorState;

use axum::extract::Request;
use axum::http::{header, Method};
use axum::middleware as axum_mw;
use axum::middleware::Next;
use axum::response::Response;
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use envelope::ApiErrorResponse;

/// Build a CORS layer that is restrictive by default (same-origin only).
///
/// Set `QUINTA_CORS_ORIGINS` to a comma-separated list of allowed origins
/// for development (e.g., `http://localhost:5173` for the dashboard dev
/// server).
fn build_cors_layer() -> CorsLayer {
    match std::env::var("QUINTA_CORS_ORIGINS") {
        Ok(origins) => {
            let allowed: Vec<_> = origins
                .split(',')
                .filter_map(|o| o.trim().parse().ok())
                .collect();
            tracing::info!(origins = %origins, "CORS: allowing configured origins");
            CorsLayer::new()
                .allow_origin(allowed)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        }
        Err(_) => {
            // No cross-origin allowed — callers are same-origin or a gateway
            CorsLayer::new()
        }
    }
}

/// Envelope-shaped 404 for unknown paths.
async fn not_found() -> Response {
    ApiErrorResponse::not_found("no such endpoint")
}

/// Build the full application router.
///
/// When `auth_token` is set, every /api/v1 request must carry
/// `Authorization: Bearer <token>`; /health stays open for probes.
pub fn create_app(state: AdvisorState, auth_token: Option<String>) -> Router {
    let mut api = routes::api_routes(state.clone());

    if let Some(token) = auth_token {
        api = api.layer(axum_mw::from_fn(move |req: Request, next: Next| {
            let expected = token.clone();
            async move { middleware::require_bearer(expected, req, next).await }
        }));
    }

    Router::new()
        .nest("/api/v1", api)
        .merge(routes::health_routes(state))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer())
        .layer(CompressionLayer::new())
}
