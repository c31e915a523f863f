//! API route definitions
//!
//! Organizes endpoints for the advisory core:
//! - POST /api/v1/advise - advisory query
//! - GET /api/v1/objectives - active objective snapshot
//! - GET /api/v1/signals - recent signal snapshot
//! - GET /api/v1/status - deployment status

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{self, AdvisorState};

/// Create all /api/v1 routes.
pub fn api_routes(state: AdvisorState) -> Router {
    Router::new()
        .route("/advise", post(handlers::advise))
        .route("/objectives", get(handlers::get_objectives))
        .route("/signals", get(handlers::get_signals))
        .route("/status", get(handlers::get_status))
        .with_state(state)
}

/// Liveness endpoint at root level.
pub fn health_routes(state: AdvisorState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .with_state(state)
}
