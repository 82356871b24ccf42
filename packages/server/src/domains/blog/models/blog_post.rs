use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use typed_builder::TypedBuilder;

use crate::common::BlogPostId;

// ============================================================================
// Enums
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "blog_post_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BlogPostStatus {
    #[default]
    Scheduled,
    Published,
}

impl std::fmt::Display for BlogPostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlogPostStatus::Scheduled => write!(f, "scheduled"),
            BlogPostStatus::Published => write!(f, "published"),
        }
    }
}

// ============================================================================
// Records
// ============================================================================

/// A blog article, from scheduling through publication and announcement.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: BlogPostId,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub meta_description: String,
    pub keywords: String,
    pub image_url: String,
    pub image_provider_id: String,
    pub category: String,
    pub read_time: i32,
    pub published_at: Option<DateTime<Utc>>,
    pub status: BlogPostStatus,
    pub telegram_posted: bool,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a freshly generated post.
#[derive(Debug, Clone, TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct NewBlogPost {
    #[builder(default = BlogPostId::new())]
    pub id: BlogPostId,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub meta_description: String,
    pub keywords: String,
    pub image_url: String,
    pub image_provider_id: String,
    pub category: String,
    pub read_time: i32,
    pub published_at: DateTime<Utc>,
    #[builder(default)]
    pub status: BlogPostStatus,
}

// =============================================================================
// SQL Queries
// =============================================================================

impl BlogPost {
    /// Insert a new post. A taken slug is reported as its own error so the
    /// caller can log it against the topic.
    pub async fn create(new: &NewBlogPost, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO blog_posts (
                id, title, slug, content, excerpt, meta_description, keywords,
                image_url, image_provider_id, category, read_time, published_at, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(new.id)
        .bind(&new.title)
        .bind(&new.slug)
        .bind(&new.content)
        .bind(&new.excerpt)
        .bind(&new.meta_description)
        .bind(&new.keywords)
        .bind(&new.image_url)
        .bind(&new.image_provider_id)
        .bind(&new.category)
        .bind(new.read_time)
        .bind(new.published_at)
        .bind(new.status)
        .fetch_one(pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                anyhow!("slug already taken: {}", new.slug)
            }
            other => other.into(),
        })
    }

    pub async fn find_by_id(id: BlogPostId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM blog_posts WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Scheduled posts whose publication time has arrived.
    pub async fn find_due_scheduled(now: DateTime<Utc>, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM blog_posts
             WHERE status = 'scheduled' AND published_at <= $1
             ORDER BY published_at ASC",
        )
        .bind(now)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Published posts that never made it to the channel, oldest first.
    pub async fn find_unannounced_published(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM blog_posts
             WHERE status = 'published' AND telegram_posted = FALSE
             ORDER BY published_at ASC",
        )
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Flip a due post to published. Returns false when the row was not
    /// eligible (already published, or not yet due).
    pub async fn mark_published(id: BlogPostId, now: DateTime<Utc>, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE blog_posts SET status = 'published'
             WHERE id = $1 AND status = 'scheduled' AND published_at <= $2",
        )
        .bind(id)
        .bind(now)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn mark_announced(id: BlogPostId, pool: &PgPool) -> Result<()> {
        sqlx::query("UPDATE blog_posts SET telegram_posted = TRUE WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn count_created_since(since: DateTime<Utc>, pool: &PgPool) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM blog_posts WHERE created_at >= $1")
            .bind(since)
            .fetch_one(pool)
            .await
            .map_err(Into::into)
    }

    /// Newest published posts first.
    pub async fn list_published(limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM blog_posts
             WHERE status = 'published'
             ORDER BY published_at DESC NULLS LAST
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_published_by_slug(slug: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM blog_posts WHERE slug = $1 AND status = 'published'",
        )
        .bind(slug)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }
}
