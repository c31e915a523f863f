//! API route handlers
//!
//! Request handling logic for the advisory endpoints:
//! - POST /api/v1/advise - the advisory query operation
//! - GET /api/v1/objectives, /api/v1/signals - strategic snapshot feeds
//! - GET /api/v1/status - store counts, backend, uptime
//! - GET /health - liveness probe

use axum::extract::State;
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::error;

use super::envelope::{ApiErrorResponse, ApiResponse};
use crate::advisor::{AdvisoryError, AdvisoryResponder, ResponderSettings};
use crate::storage::StrategicStore;

// ============================================================================
// API State
// ============================================================================

/// Shared state for API handlers
#[derive(Clone)]
pub struct AdvisorState {
    /// The advisory pipeline
    pub responder: AdvisoryResponder,
    /// Snapshot read access for the dashboard feeds
    pub store: Arc<dyn StrategicStore>,
    /// Snapshot bounds (mirrors the responder's settings)
    pub settings: ResponderSettings,
    /// Deployment name for /status
    pub deployment: String,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl AdvisorState {
    pub fn new(
        responder: AdvisoryResponder,
        store: Arc<dyn StrategicStore>,
        settings: ResponderSettings,
        deployment: impl Into<String>,
    ) -> Self {
        Self {
            responder,
            store,
            settings,
            deployment: deployment.into(),
            started_at: Instant::now(),
        }
    }
}

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AdviseRequest {
    /// Free-text advisory query. Required; empty strings are rejected.
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub deployment: String,
    pub uptime_seconds: u64,
    /// Name of the configured generation backend, if any
    pub generation_backend: Option<&'static str>,
    pub active_objectives: usize,
    pub recent_signals: usize,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub uptime_seconds: u64,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/advise — run the advisory pipeline for a query.
pub async fn advise(
    State(state): State<AdvisorState>,
    Json(req): Json<AdviseRequest>,
) -> Response {
    match state.responder.respond(&req.query).await {
        Ok(response) => ApiResponse::ok(response),
        Err(AdvisoryError::InvalidQuery) => {
            ApiErrorResponse::bad_request("query must be a non-empty string")
        }
        // Detail is already logged inside the responder; callers get a
        // generic message only.
        Err(AdvisoryError::ContextFetch(_)) => {
            ApiErrorResponse::internal("failed to assemble strategic context")
        }
        Err(AdvisoryError::Generation(_)) => {
            ApiErrorResponse::internal("advisory generation failed")
        }
    }
}

/// GET /api/v1/objectives — active objective snapshot.
pub async fn get_objectives(State(state): State<AdvisorState>) -> Response {
    match state
        .store
        .active_objectives(state.settings.objective_cap)
        .await
    {
        Ok(objectives) => ApiResponse::ok(objectives),
        Err(e) => {
            error!(error = %e, "Failed to read objective snapshot");
            ApiErrorResponse::internal("failed to read objectives")
        }
    }
}

/// GET /api/v1/signals — recent signal snapshot, newest first.
pub async fn get_signals(State(state): State<AdvisorState>) -> Response {
    match state.store.recent_signals(state.settings.signal_limit).await {
        Ok(signals) => ApiResponse::ok(signals),
        Err(e) => {
            error!(error = %e, "Failed to read signal snapshot");
            ApiErrorResponse::internal("failed to read signals")
        }
    }
}

/// GET /api/v1/status — deployment status and snapshot counts.
pub async fn get_status(State(state): State<AdvisorState>) -> Response {
    let objectives = state
        .store
        .active_objectives(state.settings.objective_cap)
        .await;
    let signals = state.store.recent_signals(state.settings.signal_limit).await;

    match (objectives, signals) {
        (Ok(objectives), Ok(signals)) => ApiResponse::ok(StatusResponse {
            deployment: state.deployment.clone(),
            uptime_seconds: state.started_at.elapsed().as_secs(),
            generation_backend: state.responder.backend_name(),
            active_objectives: objectives.len(),
            recent_signals: signals.len(),
        }),
        (Err(e), _) | (_, Err(e)) => {
            error!(error = %e, "Failed to read store for status");
            ApiErrorResponse::internal("failed to read strategic store")
        }
    }
}

/// GET /health — liveness probe at the root level.
pub async fn health_check(State(state): State<AdvisorState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })
}
