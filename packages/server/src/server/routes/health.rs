use axum::{extract::Extension, http::StatusCode, Json};
use chrono::Utc;
use serde::Serialize;

use crate::server::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    service: &'static str,
    timestamp: String,
    database: DatabaseHealth,
    connection_pool: ConnectionPoolHealth,
}

#[derive(Serialize)]
pub struct DatabaseHealth {
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    latency_ms: Option<u128>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
pub struct ConnectionPoolHealth {
    size: u32,
    idle_connections: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_connections: Option<u32>,
}

/// Health check endpoint
///
/// Checks database connectivity (with latency) and connection pool
/// utilization. Returns 200 OK when the database answers, 503 otherwise.
pub async fn health_handler(
    Extension(state): Extension<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let started = std::time::Instant::now();
    let db_health = match tokio::time::timeout(
        std::time::Duration::from_secs(5),
        sqlx::query("SELECT 1").execute(&state.db_pool),
    )
    .await
    {
        Ok(Ok(_)) => DatabaseHealth {
            status: "connected".to_string(),
            latency_ms: Some(started.elapsed().as_millis()),
            error: None,
        },
        Ok(Err(e)) => DatabaseHealth {
            status: "disconnected".to_string(),
            latency_ms: Some(started.elapsed().as_millis()),
            error: Some(format!("Query failed: {}", e)),
        },
        Err(_) => DatabaseHealth {
            status: "disconnected".to_string(),
            latency_ms: None,
            error: Some("Query timeout (>5s)".to_string()),
        },
    };

    let pool_options = state.db_pool.options();
    let pool_health = ConnectionPoolHealth {
        size: state.db_pool.size(),
        idle_connections: state.db_pool.num_idle(),
        max_connections: Some(pool_options.get_max_connections()),
    };

    let is_healthy = db_health.status == "connected";
    let (status_code, overall_status) = if is_healthy {
        (StatusCode::OK, "OK")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE")
    };

    (
        status_code,
        Json(HealthResponse {
            status: overall_status.to_string(),
            service: "evolvo-uz-api",
            timestamp: Utc::now().to_rfc3339(),
            database: db_health,
            connection_pool: pool_health,
        }),
    )
}
