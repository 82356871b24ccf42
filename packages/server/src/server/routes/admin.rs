//! Admin panel data endpoints. Mounted behind `admin_auth_middleware`.

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use crate::common::{ClientId, OrderId, PortfolioItemId, ServiceId};
use crate::domains::clients::Client;
use crate::domains::orders::{Order, OrderStatus};
use crate::domains::portfolio::{NewPortfolioItem, PortfolioItem, PortfolioItemUpdate};
use crate::domains::services::{NewService, Service, ServiceDeletion, ServiceUpdate};
use crate::server::app::AppState;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

/// Path ids that do not parse are reported like unknown ids.
fn parse_id<T: std::str::FromStr>(raw: &str, not_found: &str) -> Result<T, ApiError> {
    raw.parse().map_err(|_| ApiError::not_found(not_found))
}

// =============================================================================
// Orders
// =============================================================================

pub async fn admin_list_orders_handler(
    Extension(state): Extension<AppState>,
) -> Result<Json<Vec<Order>>, ApiError> {
    Order::list_all(&state.db_pool)
        .await
        .map(Json)
        .map_err(|e| ApiError::internal("Failed to fetch orders", e))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderRequest {
    pub status: Option<String>,
    pub admin_notes: Option<String>,
}

pub async fn admin_update_order_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateOrderRequest>,
) -> Result<Json<Order>, ApiError> {
    let id: OrderId = parse_id(&id, "Order not found")?;
    let status = request
        .status
        .as_deref()
        .map(str::parse::<OrderStatus>)
        .transpose()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    Order::update_admin(id, status, request.admin_notes.as_deref(), &state.db_pool)
        .await
        .map_err(|e| ApiError::internal("Failed to update order", e))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Order not found"))
}

// =============================================================================
// Services
// =============================================================================

pub async fn admin_list_services_handler(
    Extension(state): Extension<AppState>,
) -> Result<Json<Vec<Service>>, ApiError> {
    Service::list_all(&state.db_pool)
        .await
        .map(Json)
        .map_err(|e| ApiError::internal("Failed to fetch services", e))
}

pub async fn admin_create_service_handler(
    Extension(state): Extension<AppState>,
    Json(input): Json<NewService>,
) -> Result<(StatusCode, Json<Service>), ApiError> {
    let missing = input.missing_fields();
    if !missing.is_empty() {
        return Err(ApiError::bad_request(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }

    let service = Service::create(&input, &state.db_pool)
        .await
        .map_err(|e| ApiError::internal("Failed to create service", e))?;
    tracing::info!(service_id = %service.id, title = %service.title, "Service created");
    Ok((StatusCode::CREATED, Json(service)))
}

pub async fn admin_update_service_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
    Json(changes): Json<ServiceUpdate>,
) -> Result<Json<Service>, ApiError> {
    let id: ServiceId = parse_id(&id, "Service not found")?;
    Service::update(id, &changes, &state.db_pool)
        .await
        .map_err(|e| ApiError::internal("Failed to update service", e))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Service not found"))
}

pub async fn admin_delete_service_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id: ServiceId = parse_id(&id, "Service not found")?;
    match Service::delete(id, &state.db_pool)
        .await
        .map_err(|e| ApiError::internal("Failed to delete service", e))?
    {
        ServiceDeletion::Deleted => Ok(MessageResponse::new("Service deleted successfully")),
        ServiceDeletion::NotFound => Err(ApiError::not_found("Service not found")),
        ServiceDeletion::HasOrders => Err(ApiError::new(
            StatusCode::CONFLICT,
            "Service has orders; deactivate it instead",
        )),
    }
}

// =============================================================================
// Clients
// =============================================================================

pub async fn admin_list_clients_handler(
    Extension(state): Extension<AppState>,
) -> Result<Json<Vec<Client>>, ApiError> {
    Client::list(&state.db_pool)
        .await
        .map(Json)
        .map_err(|e| ApiError::internal("Failed to fetch clients", e))
}

#[derive(Debug, Deserialize)]
pub struct UpdateClientRequest {
    pub notes: Option<String>,
}

pub async fn admin_update_client_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateClientRequest>,
) -> Result<Json<Client>, ApiError> {
    let id: ClientId = parse_id(&id, "Client not found")?;
    Client::update_notes(id, request.notes.as_deref(), &state.db_pool)
        .await
        .map_err(|e| ApiError::internal("Failed to update client", e))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Client not found"))
}

// =============================================================================
// Portfolio
// =============================================================================

pub async fn admin_list_portfolio_handler(
    Extension(state): Extension<AppState>,
) -> Result<Json<Vec<PortfolioItem>>, ApiError> {
    PortfolioItem::list_all(&state.db_pool)
        .await
        .map(Json)
        .map_err(|e| ApiError::internal("Failed to fetch portfolio items", e))
}

pub async fn admin_create_portfolio_handler(
    Extension(state): Extension<AppState>,
    Json(input): Json<NewPortfolioItem>,
) -> Result<(StatusCode, Json<PortfolioItem>), ApiError> {
    let missing = input.missing_fields();
    if !missing.is_empty() {
        return Err(ApiError::bad_request(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }

    PortfolioItem::create(&input, &state.db_pool)
        .await
        .map(|item| (StatusCode::CREATED, Json(item)))
        .map_err(|e| ApiError::internal("Failed to create portfolio item", e))
}

pub async fn admin_update_portfolio_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
    Json(changes): Json<PortfolioItemUpdate>,
) -> Result<Json<PortfolioItem>, ApiError> {
    let id: PortfolioItemId = parse_id(&id, "Portfolio item not found")?;
    PortfolioItem::update(id, &changes, &state.db_pool)
        .await
        .map_err(|e| ApiError::internal("Failed to update portfolio item", e))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Portfolio item not found"))
}

pub async fn admin_delete_portfolio_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id: PortfolioItemId = parse_id(&id, "Portfolio item not found")?;
    let deleted = PortfolioItem::delete(id, &state.db_pool)
        .await
        .map_err(|e| ApiError::internal("Failed to delete portfolio item", e))?;

    if deleted {
        Ok(MessageResponse::new("Portfolio item deleted successfully"))
    } else {
        Err(ApiError::not_found("Portfolio item not found"))
    }
}
