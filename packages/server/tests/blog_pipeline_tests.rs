//! Daily generation pipeline against in-memory infrastructure.
//!
//! Covers the per-topic failure rules (overload, no image, taken slug),
//! image de-duplication, slot assignment and the once-a-day guard.

use chrono::{Duration, Utc};
use server_core::domains::blog::activities::{generate_daily_posts, run_daily_generation};
use server_core::domains::blog::{BlogPostStatus, ScheduleMode};
use server_core::kernel::test_dependencies::{
    blog_post_fixture, stock_image, InMemoryBlogStore, MockAI, MockImageSearch,
};
use server_core::kernel::{AiError, PublishingSettings, TestDependencies};
use std::collections::HashSet;

const TOPICS: [&str; 7] = [
    "Sun'iy intellekt biznesda",
    "Telegram botlar savdoda",
    "Veb sayt tezligi",
    "Email marketing avtomatlashtirish",
    "Vaqtni boshqarish",
    "Prompt yozish san'ati",
    "Toshkentdagi startaplar",
];

fn topics_text() -> String {
    TOPICS.join("\n")
}

fn ai_with_all_posts() -> MockAI {
    TOPICS
        .iter()
        .fold(MockAI::new().with_completion(topics_text()), |ai, topic| {
            ai.with_generated_post(topic)
        })
}

fn fast_publishing() -> PublishingSettings {
    PublishingSettings {
        schedule_mode: ScheduleMode::Fast,
        ..PublishingSettings::default()
    }
}

// =============================================================================
// Happy path
// =============================================================================

#[tokio::test]
async fn creates_one_scheduled_post_per_topic_with_distinct_images() {
    let test_deps = TestDependencies::new()
        .mock_ai(ai_with_all_posts())
        .mock_images(MockImageSearch::new().with_stock(40))
        .publishing(fast_publishing());
    let deps = test_deps.server_deps();
    let now = Utc::now();

    let report = generate_daily_posts(&deps, now).await.unwrap();

    assert_eq!(report.topics, 7);
    assert_eq!(report.created, 7);
    assert_eq!(report.skipped, 0);

    let mut posts = test_deps.blog_store.posts();
    posts.sort_by_key(|p| p.published_at);
    assert_eq!(posts.len(), 7);

    for (i, post) in posts.iter().enumerate() {
        assert_eq!(post.status, BlogPostStatus::Scheduled);
        assert!(!post.telegram_posted);
        assert_eq!(post.published_at, Some(now + Duration::minutes(i as i64 + 1)));
        assert!(post.published_at.unwrap() > now);
        assert!(!post.slug.is_empty());
        assert_eq!(post.read_time, 6);
    }

    let images: HashSet<_> = posts.iter().map(|p| p.image_provider_id.clone()).collect();
    assert_eq!(images.len(), 7, "cover images must not repeat within a run");

    let ledger = test_deps.blog_store.image_usage();
    for id in &images {
        assert!(ledger.contains_key(id), "{id} not recorded");
    }
}

#[tokio::test]
async fn prompts_carry_topic_and_category() {
    let test_deps = TestDependencies::new()
        .mock_ai(
            MockAI::new()
                .with_completion("Chatbotlar haqida")
                .with_generated_post("Chatbotlar haqida"),
        )
        .mock_images(MockImageSearch::new().with_stock(5));
    let deps = test_deps.server_deps();

    generate_daily_posts(&deps, Utc::now()).await.unwrap();

    let calls = test_deps.ai.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[1].contains("\"Chatbotlar haqida\""));

    let post = &test_deps.blog_store.posts()[0];
    assert!(calls[1].contains(&format!("{} mavzusida", post.category)));
}

// =============================================================================
// Per-topic failures
// =============================================================================

#[tokio::test(start_paused = true)]
async fn overloaded_provider_skips_only_that_topic() {
    let mut ai = MockAI::new().with_completion(topics_text());
    for _ in 0..4 {
        ai = ai.with_structured_error(AiError::Overloaded);
    }
    for topic in &TOPICS[1..] {
        ai = ai.with_generated_post(topic);
    }

    let test_deps = TestDependencies::new()
        .mock_ai(ai)
        .mock_images(MockImageSearch::new().with_stock(40));
    let deps = test_deps.server_deps();

    let report = generate_daily_posts(&deps, Utc::now()).await.unwrap();

    assert_eq!(report.created, 6);
    assert_eq!(report.skipped, 1);
    // topics call + 4 attempts for the first topic + 6 successful posts
    assert_eq!(test_deps.ai.call_count(), 1 + 4 + 6);
}

#[tokio::test]
async fn hard_provider_error_skips_topic_without_retry() {
    let ai = MockAI::new()
        .with_completion("Birinchi\nIkkinchi")
        .with_structured_error(AiError::Provider("HTTP 400".into()))
        .with_generated_post("Ikkinchi");

    let test_deps = TestDependencies::new()
        .mock_ai(ai)
        .mock_images(MockImageSearch::new().with_stock(10));
    let deps = test_deps.server_deps();

    let report = generate_daily_posts(&deps, Utc::now()).await.unwrap();

    assert_eq!((report.created, report.skipped), (1, 1));
    assert_eq!(test_deps.ai.call_count(), 3);
}

#[tokio::test]
async fn no_unused_image_means_no_post() {
    let used = stock_image("only-photo");
    let test_deps = TestDependencies::new()
        .mock_ai(
            MockAI::new()
                .with_completion("Yagona mavzu")
                .with_generated_post("Yagona mavzu"),
        )
        .mock_images(MockImageSearch::new().with_default_results(vec![used.clone()]))
        .mock_store(InMemoryBlogStore::new().with_image_usage(&used.id, Utc::now() - Duration::days(3)));
    let deps = test_deps.server_deps();

    let report = generate_daily_posts(&deps, Utc::now()).await.unwrap();

    assert_eq!((report.created, report.skipped), (0, 1));
    assert!(test_deps.blog_store.posts().is_empty());
}

#[tokio::test]
async fn images_outside_reuse_window_are_eligible_again() {
    let old = stock_image("old-photo");
    let test_deps = TestDependencies::new()
        .mock_ai(
            MockAI::new()
                .with_completion("Yagona mavzu")
                .with_generated_post("Yagona mavzu"),
        )
        .mock_images(MockImageSearch::new().with_default_results(vec![old.clone()]))
        .mock_store(InMemoryBlogStore::new().with_image_usage(&old.id, Utc::now() - Duration::days(91)));
    let deps = test_deps.server_deps();

    let report = generate_daily_posts(&deps, Utc::now()).await.unwrap();

    assert_eq!(report.created, 1);
    assert_eq!(test_deps.blog_store.posts()[0].image_provider_id, old.id);
    assert!(test_deps.blog_store.image_usage()[&old.id] > Utc::now() - Duration::days(1));
}

#[tokio::test]
async fn duplicate_title_fails_second_post_only() {
    let ai = MockAI::new()
        .with_completion("Birinchi\nIkkinchi\nUchinchi")
        .with_generated_post("AI va Biznes")
        .with_generated_post("AI va biznes!")
        .with_generated_post("Boshqa sarlavha");

    let test_deps = TestDependencies::new()
        .mock_ai(ai)
        .mock_images(MockImageSearch::new().with_stock(20));
    let deps = test_deps.server_deps();

    let report = generate_daily_posts(&deps, Utc::now()).await.unwrap();

    assert_eq!((report.created, report.skipped), (2, 1));
    let slugs: Vec<_> = test_deps.blog_store.posts().into_iter().map(|p| p.slug).collect();
    assert!(slugs.contains(&"ai-va-biznes".to_string()));
    assert!(slugs.contains(&"boshqa-sarlavha".to_string()));
    // The losing post's image was already recorded before the insert failed
    assert_eq!(test_deps.blog_store.image_usage().len(), 3);
}

#[tokio::test]
async fn title_without_slug_characters_is_skipped() {
    let test_deps = TestDependencies::new()
        .mock_ai(
            MockAI::new()
                .with_completion("Mavzu")
                .with_generated_post("Привет мир"),
        )
        .mock_images(MockImageSearch::new().with_stock(5));
    let deps = test_deps.server_deps();

    let report = generate_daily_posts(&deps, Utc::now()).await.unwrap();

    assert_eq!((report.created, report.skipped), (0, 1));
    assert!(test_deps.blog_store.image_usage().is_empty());
}

// =============================================================================
// Run-level behaviour
// =============================================================================

#[tokio::test]
async fn topic_failure_aborts_run() {
    let test_deps = TestDependencies::new()
        .mock_ai(MockAI::new().with_completion_error(AiError::Provider("quota".into())))
        .mock_images(MockImageSearch::new().with_stock(5));
    let deps = test_deps.server_deps();

    assert!(generate_daily_posts(&deps, Utc::now()).await.is_err());
    assert!(test_deps.blog_store.posts().is_empty());
}

#[tokio::test]
async fn daily_guard_skips_when_posts_exist_today() {
    let existing = blog_post_fixture("bugungi", BlogPostStatus::Scheduled, Utc::now() + Duration::hours(3));
    let test_deps = TestDependencies::new()
        .mock_store(InMemoryBlogStore::new().with_post(existing))
        .mock_ai(ai_with_all_posts())
        .mock_images(MockImageSearch::new().with_stock(40));
    let deps = test_deps.server_deps();

    let report = run_daily_generation(&deps, true).await.unwrap();

    assert!(report.already_ran_today);
    assert_eq!(report.created, 0);
    assert_eq!(test_deps.ai.call_count(), 0);
}

#[tokio::test]
async fn guard_is_ignored_when_not_requested() {
    let existing = blog_post_fixture("bugungi", BlogPostStatus::Scheduled, Utc::now() + Duration::hours(3));
    let test_deps = TestDependencies::new()
        .mock_store(InMemoryBlogStore::new().with_post(existing))
        .mock_ai(ai_with_all_posts())
        .mock_images(MockImageSearch::new().with_stock(40));
    let deps = test_deps.server_deps();

    let report = run_daily_generation(&deps, false).await.unwrap();

    assert!(!report.already_ran_today);
    assert_eq!(report.created, 7);
}
