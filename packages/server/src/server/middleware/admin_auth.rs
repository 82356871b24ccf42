use axum::{extract::Request, middleware::Next, response::Response};
use std::sync::Arc;
use tracing::{debug, warn};

use super::trigger_auth::{is_authorized, unauthorized_response};

/// Bearer-token guard for the admin API.
///
/// Unlike the trigger guard this one fails closed: with no token configured
/// every admin request is rejected.
pub async fn admin_auth_middleware(
    token: Option<Arc<str>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(token) = token else {
        warn!(path = %request.uri().path(), "Admin API disabled, ADMIN_API_TOKEN not set");
        return unauthorized_response();
    };

    if !is_authorized(&request, &token) {
        warn!(path = %request.uri().path(), "Rejected admin call with missing or wrong token");
        return unauthorized_response();
    }

    debug!(path = %request.uri().path(), "Admin token accepted");
    next.run(request).await
}
