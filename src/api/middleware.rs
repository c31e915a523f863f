//! API middleware layers.
//!
//! Currently provides the optional bearer-token verification hook for the
//! /api/v1 surface. Token issuance and identity verification proper belong
//! to the fronting gateway; this hook only compares an opaque shared secret.

use axum::extract::Request;
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use super::envelope::ApiErrorResponse;

/// Reject requests whose `Authorization` header does not carry the expected
/// bearer token. Applied only when `server.auth_token` is configured.
pub async fn require_bearer(expected: String, request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|token| token == expected);

    if !authorized {
        return ApiErrorResponse::unauthorized("missing or invalid bearer token");
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, StatusCode};
    use axum::middleware;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    fn protected_app() -> Router {
        Router::new()
            .route("/test", get(|| async { "ok" }))
            .layer(middleware::from_fn(|req: Request, next: Next| async {
                require_bearer("s3cret".to_string(), req, next).await
            }))
    }

    #[tokio::test]
    async fn test_missing_token_rejected() {
        let resp = protected_app()
            .oneshot(HttpRequest::get("/test").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_wrong_token_rejected() {
        let resp = protected_app()
            .oneshot(
                HttpRequest::get("/test")
                    .header("authorization", "Bearer wrong")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_correct_token_passes() {
        let resp = protected_app()
            .oneshot(
                HttpRequest::get("/test")
                    .header("authorization", "Bearer s3cret")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
    }
}
