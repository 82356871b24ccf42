//! Publication sweep: promote due posts, then announce anything published
//! but not yet on the channel.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use super::caption::build_caption;
use crate::domains::blog::BlogPost;
use crate::kernel::ServerDeps;

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct SweepReport {
    pub published: usize,
    pub announced: usize,
    pub announce_failures: usize,
}

pub async fn publish_due_posts(deps: &ServerDeps) -> Result<SweepReport> {
    publish_due_posts_at(deps, Utc::now()).await
}

/// Sweep as of `now`. Safe to run repeatedly: each post is promoted at most
/// once and announced until one send succeeds.
pub async fn publish_due_posts_at(deps: &ServerDeps, now: DateTime<Utc>) -> Result<SweepReport> {
    let store = &deps.blog_store;
    let mut report = SweepReport::default();

    let due = store.find_due_scheduled(now).await?;
    let mut to_announce: Vec<BlogPost> = Vec::new();

    for post in due {
        match store.mark_published(post.id, now).await {
            Ok(true) => {
                report.published += 1;
                info!(post_id = %post.id, slug = %post.slug, "Published blog post");
                if !post.telegram_posted {
                    to_announce.push(post);
                }
            }
            Ok(false) => debug!(post_id = %post.id, "Post no longer eligible for publishing"),
            Err(e) => error!(post_id = %post.id, error = %e, "Failed to publish blog post"),
        }
    }

    // Earlier announcements that failed, however old
    for post in store.find_unannounced_published().await? {
        if !to_announce.iter().any(|p| p.id == post.id) {
            to_announce.push(post);
        }
    }

    if to_announce.is_empty() {
        return Ok(report);
    }

    let Some(channel) = deps.publishing.blog_channel_id.as_deref() else {
        warn!(
            pending = to_announce.len(),
            "Blog channel not configured, announcements skipped"
        );
        report.announce_failures = to_announce.len();
        return Ok(report);
    };

    for post in &to_announce {
        if announce(deps, channel, post).await {
            report.announced += 1;
        } else {
            report.announce_failures += 1;
        }
    }

    info!(
        published = report.published,
        announced = report.announced,
        announce_failures = report.announce_failures,
        "Publication sweep finished"
    );
    Ok(report)
}

/// Send one announcement; the flag is only set after a successful send.
async fn announce(deps: &ServerDeps, channel: &str, post: &BlogPost) -> bool {
    let caption = build_caption(post, &deps.publishing.site_url);
    let image_url = Some(post.image_url.as_str()).filter(|url| !url.is_empty());

    if let Err(e) = deps.notifier.send(channel, &caption, image_url).await {
        warn!(post_id = %post.id, error = %e, "Announcement failed, will retry next sweep");
        return false;
    }

    if let Err(e) = deps.blog_store.mark_announced(post.id).await {
        // Sent but not flagged: the next sweep sends it again.
        error!(post_id = %post.id, error = %e, "Failed to flag post as announced");
        return false;
    }

    info!(post_id = %post.id, "Announced blog post");
    true
}
