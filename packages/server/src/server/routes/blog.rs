use axum::{
    extract::{Extension, Path, Query},
    Json,
};
use serde::Deserialize;

use super::error::ApiError;
use crate::domains::blog::BlogPost;
use crate::server::app::AppState;

pub const DEFAULT_BLOG_LIMIT: i64 = 20;
pub const MAX_BLOG_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct ListBlogParams {
    pub limit: Option<i64>,
}

/// Published posts, newest first.
pub async fn list_blog_posts_handler(
    Extension(state): Extension<AppState>,
    Query(params): Query<ListBlogParams>,
) -> Result<Json<Vec<BlogPost>>, ApiError> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_BLOG_LIMIT)
        .clamp(1, MAX_BLOG_LIMIT);

    state
        .deps
        .blog_store
        .list_published(limit)
        .await
        .map(Json)
        .map_err(|e| ApiError::internal("Failed to fetch blog posts", e))
}

/// A single published post.
pub async fn get_blog_post_handler(
    Extension(state): Extension<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<BlogPost>, ApiError> {
    state
        .deps
        .blog_store
        .find_published_by_slug(&slug)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch blog post", e))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Blog post not found"))
}
