use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};

use crate::common::ServiceId;

/// A catalogue service offered on the site.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: ServiceId,
    pub title: String,
    pub description: String,
    pub price_range: String,
    pub duration: String,
    pub image_url: Option<String>,
    /// Prompt seed; `{service}` is replaced with the title
    pub ai_prompt_template: String,
    pub features: Json<Vec<String>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Admin payload for a new catalogue entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewService {
    pub title: String,
    pub description: String,
    pub price_range: String,
    pub duration: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub ai_prompt_template: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl NewService {
    /// Names of required fields that are blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("title", &self.title),
            ("description", &self.description),
            ("priceRange", &self.price_range),
            ("duration", &self.duration),
            ("aiPromptTemplate", &self.ai_prompt_template),
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
pub struct ServiceUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price_range: Option<String>,
    pub duration: Option<String>,
    pub image_url: Option<String>,
    pub ai_prompt_template: Option<String>,
    pub features: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

/// Result of an admin delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceDeletion {
    Deleted,
    NotFound,
    /// Orders still reference it; deactivate instead
    HasOrders,
}

impl Service {
    pub async fn list_active(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM services WHERE is_active = TRUE ORDER BY created_at ASC",
        )
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_active_by_id(id: ServiceId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM services WHERE id = $1 AND is_active = TRUE")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Every service, inactive ones included.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM services ORDER BY created_at ASC")
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn create(input: &NewService, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO services (
                id, title, description, price_range, duration, image_url,
                ai_prompt_template, features, is_active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(ServiceId::new())
        .bind(input.title.trim())
        .bind(&input.description)
        .bind(input.price_range.trim())
        .bind(input.duration.trim())
        .bind(&input.image_url)
        .bind(&input.ai_prompt_template)
        .bind(Json(&input.features))
        .bind(input.is_active)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn update(
        id: ServiceId,
        changes: &ServiceUpdate,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE services SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                price_range = COALESCE($4, price_range),
                duration = COALESCE($5, duration),
                image_url = COALESCE($6, image_url),
                ai_prompt_template = COALESCE($7, ai_prompt_template),
                features = COALESCE($8, features),
                is_active = COALESCE($9, is_active)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(&changes.price_range)
        .bind(&changes.duration)
        .bind(&changes.image_url)
        .bind(&changes.ai_prompt_template)
        .bind(changes.features.as_ref().map(Json))
        .bind(changes.is_active)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn delete(id: ServiceId, pool: &PgPool) -> Result<ServiceDeletion> {
        let result = sqlx::query("DELETE FROM services WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await;

        match result {
            Ok(done) if done.rows_affected() > 0 => Ok(ServiceDeletion::Deleted),
            Ok(_) => Ok(ServiceDeletion::NotFound),
            Err(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => {
                Ok(ServiceDeletion::HasOrders)
            }
            Err(e) => Err(e.into()),
        }
    }
}
