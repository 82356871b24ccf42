//! Test fixtures for creating test data.

use chrono::{DateTime, Utc};
use server_core::common::ServiceId;
use server_core::domains::blog::NewBlogPost;
use server_core::domains::portfolio::NewPortfolioItem;
use uuid::Uuid;

/// Seeded "Telegram botlar" service.
pub fn telegram_bots_service_id() -> ServiceId {
    "0190a000-0000-7000-8000-000000000002"
        .parse()
        .expect("valid seeded service id")
}

/// Slug that no other test will use.
pub fn unique_slug(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}

/// Image id that no other test will use.
pub fn unique_image_id() -> String {
    format!("photo-{}", Uuid::new_v4().simple())
}

/// A scheduled post due at `published_at`.
pub fn new_post(slug: &str, published_at: DateTime<Utc>) -> NewBlogPost {
    NewBlogPost::builder()
        .title(format!("Test post {slug}"))
        .slug(slug)
        .content("Mazmun")
        .excerpt("Qisqacha")
        .meta_description("Meta")
        .keywords("ai, test")
        .image_url(format!("https://images.example/{slug}.jpg"))
        .image_provider_id(format!("photo-{slug}"))
        .category("Veb Dasturlash")
        .read_time(4)
        .published_at(published_at)
        .build()
}

/// A portfolio item with the given placement flags.
pub fn new_portfolio_item(
    title: &str,
    sort_order: i32,
    featured: bool,
    is_public: bool,
) -> NewPortfolioItem {
    NewPortfolioItem {
        title: title.to_string(),
        description: format!("{title} loyihasi"),
        image_url: format!("https://images.example/{}.jpg", Uuid::new_v4().simple()),
        project_url: None,
        category: "web".to_string(),
        technologies: vec!["Rust".to_string()],
        client_name: None,
        completed_at: None,
        is_public,
        featured,
        sort_order,
        meta_description: None,
    }
}
