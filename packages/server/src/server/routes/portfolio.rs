use axum::{
    extract::{Extension, Path},
    Json,
};

use super::error::ApiError;
use crate::common::PortfolioItemId;
use crate::domains::portfolio::PortfolioItem;
use crate::server::app::AppState;

pub async fn list_portfolio_handler(
    Extension(state): Extension<AppState>,
) -> Result<Json<Vec<PortfolioItem>>, ApiError> {
    PortfolioItem::list_public(&state.db_pool)
        .await
        .map(Json)
        .map_err(|e| ApiError::internal("Failed to fetch portfolio items", e))
}

pub async fn list_featured_portfolio_handler(
    Extension(state): Extension<AppState>,
) -> Result<Json<Vec<PortfolioItem>>, ApiError> {
    PortfolioItem::list_featured(&state.db_pool)
        .await
        .map(Json)
        .map_err(|e| ApiError::internal("Failed to fetch featured portfolio items", e))
}

/// Hidden items answer 404 like missing ones.
pub async fn get_portfolio_item_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PortfolioItem>, ApiError> {
    let id: PortfolioItemId = id
        .parse()
        .map_err(|_| ApiError::not_found("Portfolio item not found"))?;

    PortfolioItem::find_public_by_id(id, &state.db_pool)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch portfolio item", e))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Portfolio item not found"))
}
