use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

/// Ledger row: a stock photo id and the last time an article used it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ImageUsage {
    pub image_id: String,
    pub used_at: DateTime<Utc>,
}

impl ImageUsage {
    /// Record a use, refreshing the timestamp if the id is already known.
    pub async fn upsert(image_id: &str, used_at: DateTime<Utc>, pool: &PgPool) -> Result<()> {
        sqlx::query(
            "INSERT INTO image_usage (image_id, used_at) VALUES ($1, $2)
             ON CONFLICT (image_id) DO UPDATE SET used_at = EXCLUDED.used_at",
        )
        .bind(image_id)
        .bind(used_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn ids_used_since(since: DateTime<Utc>, pool: &PgPool) -> Result<Vec<String>> {
        sqlx::query_scalar::<_, String>("SELECT image_id FROM image_usage WHERE used_at >= $1")
            .bind(since)
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find(image_id: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM image_usage WHERE image_id = $1")
            .bind(image_id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }
}
