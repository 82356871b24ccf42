//! Cover image selection with a 90-day no-reuse rule.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use tracing::{debug, warn};

use super::super::{BlogCategory, FALLBACK_IMAGE_QUERY};
use crate::kernel::{BaseImageSearch, ImageCandidate, ImageQuery, Orientation};

/// A photo used within this window may not be used again.
pub const IMAGE_REUSE_WINDOW_DAYS: i64 = 90;

/// Results requested per search phrase.
pub const IMAGES_PER_QUERY: u32 = 30;

pub fn reuse_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(IMAGE_REUSE_WINDOW_DAYS)
}

/// Pick a landscape photo for `category` whose id is not in `excluded`.
///
/// Phrases are tried in order, then the generic fallback; within a phrase the
/// pick is random among eligible results. A failing search counts as no
/// result for that phrase.
pub async fn select_image(
    search: &dyn BaseImageSearch,
    category: BlogCategory,
    excluded: &HashSet<String>,
) -> Option<ImageCandidate> {
    let phrases = category
        .image_queries()
        .iter()
        .copied()
        .chain(std::iter::once(FALLBACK_IMAGE_QUERY));

    for phrase in phrases {
        if let Some(image) = search_unused(search, phrase, excluded).await {
            debug!(phrase, image_id = %image.id, "Selected cover image");
            return Some(image);
        }
    }

    warn!(category = %category, "No unused cover image found");
    None
}

async fn search_unused(
    search: &dyn BaseImageSearch,
    phrase: &str,
    excluded: &HashSet<String>,
) -> Option<ImageCandidate> {
    let query = ImageQuery {
        text: phrase,
        per_page: IMAGES_PER_QUERY,
        orientation: Orientation::Landscape,
    };

    let results = match search.search(query).await {
        Ok(results) => results,
        Err(e) => {
            warn!(phrase, error = %e, "Image search failed");
            return None;
        }
    };

    let eligible: Vec<ImageCandidate> = results
        .into_iter()
        .filter(|image| !excluded.contains(&image.id))
        .collect();

    eligible.choose(&mut rand::thread_rng()).cloned()
}
