use axum::{
    extract::Request,
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

/// Shared-secret guard for the trigger endpoints.
///
/// With no secret configured every request passes. Otherwise the request must
/// carry `Authorization: Bearer <secret>`.
pub async fn trigger_auth_middleware(
    secret: Option<Arc<str>>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(secret) = secret {
        if !is_authorized(&request, &secret) {
            warn!(path = %request.uri().path(), "Rejected trigger call with missing or wrong secret");
            return unauthorized_response();
        }
        debug!("Trigger secret accepted");
    }

    next.run(request).await
}

pub(crate) fn is_authorized(request: &Request, secret: &str) -> bool {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .is_some_and(|token| token.trim() == secret)
}

/// Error response for rejected trigger and admin calls
pub fn unauthorized_response() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "success": false, "message": "Unauthorized" })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request_with(header: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder().uri("/api/blog/publish-scheduled");
        if let Some(value) = header {
            builder = builder.header("authorization", value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_matching_bearer_token() {
        assert!(is_authorized(&request_with(Some("Bearer s3cret")), "s3cret"));
    }

    #[test]
    fn test_wrong_or_raw_token() {
        assert!(!is_authorized(&request_with(Some("Bearer nope")), "s3cret"));
        assert!(!is_authorized(&request_with(Some("s3cret")), "s3cret"));
    }

    #[test]
    fn test_no_auth_header() {
        assert!(!is_authorized(&request_with(None), "s3cret"));
    }
}
