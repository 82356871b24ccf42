// Persistence seam for the blog pipeline
//
// Activities talk to BlogStore so the generation and publishing flows can be
// exercised against an in-memory store; PgBlogStore delegates to the model
// queries.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::models::{BlogPost, ImageUsage, NewBlogPost};
use crate::common::BlogPostId;

#[async_trait]
pub trait BlogStore: Send + Sync {
    /// Insert a post; fails if the slug is already taken.
    async fn insert_post(&self, post: NewBlogPost) -> Result<BlogPost>;

    /// Scheduled -> published for a post that is due. False if not eligible.
    async fn mark_published(&self, id: BlogPostId, now: DateTime<Utc>) -> Result<bool>;

    async fn mark_announced(&self, id: BlogPostId) -> Result<()>;

    async fn find_due_scheduled(&self, now: DateTime<Utc>) -> Result<Vec<BlogPost>>;

    /// Published but not yet announced, regardless of age.
    async fn find_unannounced_published(&self) -> Result<Vec<BlogPost>>;

    async fn upsert_image_usage(&self, image_id: &str, used_at: DateTime<Utc>) -> Result<()>;

    async fn used_image_ids_since(&self, since: DateTime<Utc>) -> Result<Vec<String>>;

    async fn count_created_since(&self, since: DateTime<Utc>) -> Result<i64>;

    async fn list_published(&self, limit: i64) -> Result<Vec<BlogPost>>;

    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<BlogPost>>;
}

/// Postgres-backed store.
#[derive(Clone)]
pub struct PgBlogStore {
    pool: PgPool,
}

impl PgBlogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BlogStore for PgBlogStore {
    async fn insert_post(&self, post: NewBlogPost) -> Result<BlogPost> {
        BlogPost::create(&post, &self.pool).await
    }

    async fn mark_published(&self, id: BlogPostId, now: DateTime<Utc>) -> Result<bool> {
        BlogPost::mark_published(id, now, &self.pool).await
    }

    async fn mark_announced(&self, id: BlogPostId) -> Result<()> {
        BlogPost::mark_announced(id, &self.pool).await
    }

    async fn find_due_scheduled(&self, now: DateTime<Utc>) -> Result<Vec<BlogPost>> {
        BlogPost::find_due_scheduled(now, &self.pool).await
    }

    async fn find_unannounced_published(&self) -> Result<Vec<BlogPost>> {
        BlogPost::find_unannounced_published(&self.pool).await
    }

    async fn upsert_image_usage(&self, image_id: &str, used_at: DateTime<Utc>) -> Result<()> {
        ImageUsage::upsert(image_id, used_at, &self.pool).await
    }

    async fn used_image_ids_since(&self, since: DateTime<Utc>) -> Result<Vec<String>> {
        ImageUsage::ids_used_since(since, &self.pool).await
    }

    async fn count_created_since(&self, since: DateTime<Utc>) -> Result<i64> {
        BlogPost::count_created_since(since, &self.pool).await
    }

    async fn list_published(&self, limit: i64) -> Result<Vec<BlogPost>> {
        BlogPost::list_published(limit, &self.pool).await
    }

    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<BlogPost>> {
        BlogPost::find_published_by_slug(slug, &self.pool).await
    }
}
