use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};

use crate::common::PortfolioItemId;

/// How many items the home page carousel shows.
pub const FEATURED_LIMIT: i64 = 6;

/// A finished project shown on the public site.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioItem {
    pub id: PortfolioItemId,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub project_url: Option<String>,
    pub category: String,
    pub technologies: Json<Vec<String>>,
    pub client_name: Option<String>,
    pub completed_at: DateTime<Utc>,
    pub is_public: bool,
    pub featured: bool,
    pub sort_order: i32,
    pub meta_description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Admin payload for a new item.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPortfolioItem {
    pub title: String,
    pub description: String,
    pub image_url: String,
    #[serde(default)]
    pub project_url: Option<String>,
    pub category: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub client_name: Option<String>,
    /// Defaults to now
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default = "default_true")]
    pub is_public: bool,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub meta_description: Option<String>,
}

fn default_true() -> bool {
    true
}

impl NewPortfolioItem {
    /// Names of required fields that are blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("title", &self.title),
            ("description", &self.description),
            ("imageUrl", &self.image_url),
            ("category", &self.category),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioItemUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub project_url: Option<String>,
    pub category: Option<String>,
    pub technologies: Option<Vec<String>>,
    pub client_name: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub is_public: Option<bool>,
    pub featured: Option<bool>,
    pub sort_order: Option<i32>,
    pub meta_description: Option<String>,
}

impl PortfolioItem {
    /// Public items, pinned ones first, then most recently completed.
    pub async fn list_public(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM portfolio WHERE is_public = TRUE
             ORDER BY sort_order DESC, completed_at DESC",
        )
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn list_featured(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM portfolio WHERE is_public = TRUE AND featured = TRUE
             ORDER BY sort_order DESC, completed_at DESC
             LIMIT $1",
        )
        .bind(FEATURED_LIMIT)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_public_by_id(id: PortfolioItemId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM portfolio WHERE id = $1 AND is_public = TRUE")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Every item, hidden ones included.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM portfolio ORDER BY sort_order DESC, completed_at DESC",
        )
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn create(input: &NewPortfolioItem, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO portfolio (
                id, title, description, image_url, project_url, category,
                technologies, client_name, completed_at, is_public, featured,
                sort_order, meta_description
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, COALESCE($9, NOW()), $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(PortfolioItemId::new())
        .bind(input.title.trim())
        .bind(&input.description)
        .bind(input.image_url.trim())
        .bind(&input.project_url)
        .bind(input.category.trim())
        .bind(Json(&input.technologies))
        .bind(&input.client_name)
        .bind(input.completed_at)
        .bind(input.is_public)
        .bind(input.featured)
        .bind(input.sort_order)
        .bind(&input.meta_description)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn update(
        id: PortfolioItemId,
        changes: &PortfolioItemUpdate,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE portfolio SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                image_url = COALESCE($4, image_url),
                project_url = COALESCE($5, project_url),
                category = COALESCE($6, category),
                technologies = COALESCE($7, technologies),
                client_name = COALESCE($8, client_name),
                completed_at = COALESCE($9, completed_at),
                is_public = COALESCE($10, is_public),
                featured = COALESCE($11, featured),
                sort_order = COALESCE($12, sort_order),
                meta_description = COALESCE($13, meta_description),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(&changes.image_url)
        .bind(&changes.project_url)
        .bind(&changes.category)
        .bind(changes.technologies.as_ref().map(Json))
        .bind(&changes.client_name)
        .bind(changes.completed_at)
        .bind(changes.is_public)
        .bind(changes.featured)
        .bind(changes.sort_order)
        .bind(&changes.meta_description)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// True when a row was removed.
    pub async fn delete(id: PortfolioItemId, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query("DELETE FROM portfolio WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
