use axum::{extract::Extension, http::StatusCode, Json};

use super::error::ApiError;
use crate::domains::orders::activities::{submit_order, OrderError};
use crate::domains::orders::{CreateOrder, Order};
use crate::server::app::AppState;

pub async fn create_order_handler(
    Extension(state): Extension<AppState>,
    Json(input): Json<CreateOrder>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    match submit_order(input, &state.db_pool, &state.deps).await {
        Ok(order) => Ok((StatusCode::CREATED, Json(order))),
        Err(OrderError::Invalid(fields)) => {
            Err(ApiError::bad_request(format!("Missing required fields: {}", fields)))
        }
        Err(OrderError::UnknownService) => Err(ApiError::not_found("Service not found")),
        Err(OrderError::Internal(e)) => Err(ApiError::internal("Failed to create order", e)),
    }
}
