//! Daily generation run.
//!
//! Pipeline:
//! 1. Optional guard: skip when posts were already created today (Tashkent)
//! 2. Load image ids used within the reuse window
//! 3. Ask for up to 7 topics (a failure here aborts the run)
//! 4. For each topic, in order, with its publication slot:
//!    a. Pick a random category
//!    b. Generate the article (overload retries, then skip)
//!    c. Pick an unused cover image (none -> skip)
//!    d. Record the image use, add it to the in-run exclusion set
//!    e. Insert the post as scheduled
//! 5. Return counts; per-topic failures are logged, never fatal

use std::collections::HashSet;

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, warn};

use super::content::generate_post;
use super::images::{reuse_cutoff, select_image};
use super::schedule::{publish_slots, start_of_local_day};
use super::slug::slugify;
use super::topics::generate_topics;
use crate::domains::blog::{BlogCategory, BlogPost, NewBlogPost};
use crate::kernel::{AiOutcome, ServerDeps};

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct GenerationReport {
    /// Topics returned by the model
    pub topics: usize,
    pub created: usize,
    /// Topics that did not produce a post
    pub skipped: usize,
    /// Set when the daily guard stopped the run before any work
    pub already_ran_today: bool,
}

/// Entry point for both triggers. With `skip_if_already_ran_today` the run is
/// a no-op once any post was created since local midnight.
pub async fn run_daily_generation(
    deps: &ServerDeps,
    skip_if_already_ran_today: bool,
) -> Result<GenerationReport> {
    let now = Utc::now();

    if skip_if_already_ran_today {
        let created_today = deps
            .blog_store
            .count_created_since(start_of_local_day(now))
            .await?;
        if created_today > 0 {
            info!(created_today, "Posts already generated today, skipping run");
            return Ok(GenerationReport {
                already_ran_today: true,
                ..Default::default()
            });
        }
    }

    generate_daily_posts(deps, now).await
}

/// Generate and schedule one post per topic.
pub async fn generate_daily_posts(deps: &ServerDeps, now: DateTime<Utc>) -> Result<GenerationReport> {
    let mut excluded: HashSet<String> = deps
        .blog_store
        .used_image_ids_since(reuse_cutoff(now))
        .await?
        .into_iter()
        .collect();

    let topics = generate_topics(deps.ai.as_ref()).await?;
    let slots = publish_slots(deps.publishing.schedule_mode, now);

    let mut report = GenerationReport {
        topics: topics.len(),
        ..Default::default()
    };

    for (topic, publish_at) in topics.iter().zip(slots) {
        match create_scheduled_post(deps, topic, publish_at, &mut excluded).await {
            Ok(post) => {
                report.created += 1;
                info!(
                    post_id = %post.id,
                    slug = %post.slug,
                    publish_at = %publish_at,
                    "Scheduled blog post"
                );
            }
            Err(e) => {
                report.skipped += 1;
                error!(topic = %topic, error = %e, "Failed to create blog post");
            }
        }
    }

    info!(
        topics = report.topics,
        created = report.created,
        skipped = report.skipped,
        "Daily generation finished"
    );
    Ok(report)
}

async fn create_scheduled_post(
    deps: &ServerDeps,
    topic: &str,
    publish_at: DateTime<Utc>,
    excluded: &mut HashSet<String>,
) -> Result<BlogPost> {
    let category = BlogCategory::random();

    let content = match generate_post(deps.ai.as_ref(), topic, category).await? {
        AiOutcome::Ready(content) => content,
        AiOutcome::ProviderUnavailable => {
            warn!(topic, "AI provider overloaded after retries");
            bail!("AI provider unavailable");
        }
    };

    let slug = slugify(&content.title);
    if slug.is_empty() {
        bail!("title has no slug characters: {}", content.title);
    }

    let Some(image) = select_image(deps.image_search.as_ref(), category, excluded).await else {
        bail!("no unused cover image for category {}", category);
    };

    deps.blog_store
        .upsert_image_usage(&image.id, Utc::now())
        .await?;
    excluded.insert(image.id.clone());

    let new_post = NewBlogPost::builder()
        .title(content.title)
        .slug(slug)
        .content(content.content)
        .excerpt(content.excerpt)
        .meta_description(content.meta_description)
        .keywords(content.keywords)
        .image_url(image.url)
        .image_provider_id(image.id)
        .category(category.display_name())
        .read_time(content.read_time)
        .published_at(publish_at)
        .build();

    deps.blog_store.insert_post(new_post).await
}
