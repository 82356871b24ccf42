// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use super::{
    AiError, BaseAI, BaseImageSearch, BaseNotifier, ImageCandidate, ImageQuery,
    PublishingSettings, ServerDeps,
};
use crate::common::BlogPostId;
use crate::domains::blog::{BlogPost, BlogPostStatus, BlogStore, NewBlogPost};

// =============================================================================
// Mock AI
// =============================================================================

/// Queued answers for the two AI entry points. An empty structured queue
/// answers with a provider error so missing setup fails loudly.
pub struct MockAI {
    completions: Arc<Mutex<VecDeque<Result<String, AiError>>>>,
    structured: Arc<Mutex<VecDeque<Result<String, AiError>>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockAI {
    pub fn new() -> Self {
        Self {
            completions: Arc::new(Mutex::new(VecDeque::new())),
            structured: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a plain text answer to the queue
    pub fn with_completion(self, text: impl Into<String>) -> Self {
        self.completions.lock().unwrap().push_back(Ok(text.into()));
        self
    }

    pub fn with_completion_error(self, error: AiError) -> Self {
        self.completions.lock().unwrap().push_back(Err(error));
        self
    }

    /// Add a raw structured (JSON) answer to the queue
    pub fn with_structured(self, json: impl Into<String>) -> Self {
        self.structured.lock().unwrap().push_back(Ok(json.into()));
        self
    }

    pub fn with_structured_error(self, error: AiError) -> Self {
        self.structured.lock().unwrap().push_back(Err(error));
        self
    }

    /// Queue a well-formed article whose title is `title`
    pub fn with_generated_post(self, title: &str) -> Self {
        let json = serde_json::json!({
            "title": title,
            "content": format!("{title} haqida batafsil maqola."),
            "excerpt": format!("{title} haqida qisqacha."),
            "metaDescription": format!("{title} meta"),
            "keywords": "ai, avtomatlashtirish, biznes",
            "readTime": 6,
        });
        self.with_structured(json.to_string())
    }

    /// Get all prompts that were sent to the AI
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Get the number of times the AI was called
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Check if a prompt containing the given text was sent
    pub fn was_called_with(&self, text: &str) -> bool {
        self.calls.lock().unwrap().iter().any(|p| p.contains(text))
    }
}

impl Default for MockAI {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseAI for MockAI {
    async fn complete(&self, prompt: &str) -> Result<String, AiError> {
        self.calls.lock().unwrap().push(prompt.to_string());
        self.completions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("Mock AI response".to_string()))
    }

    async fn generate_structured(
        &self,
        prompt: &str,
        _schema: serde_json::Value,
    ) -> Result<String, AiError> {
        self.calls.lock().unwrap().push(prompt.to_string());
        self.structured
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AiError::Provider("no structured response queued".into())))
    }
}

// =============================================================================
// Mock Image Search
// =============================================================================

pub struct MockImageSearch {
    by_query: Arc<Mutex<HashMap<String, Result<Vec<ImageCandidate>, String>>>>,
    fallback: Arc<Mutex<Vec<ImageCandidate>>>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl MockImageSearch {
    pub fn new() -> Self {
        Self {
            by_query: Arc::new(Mutex::new(HashMap::new())),
            fallback: Arc::new(Mutex::new(Vec::new())),
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Results for one exact query
    pub fn with_results(self, query: &str, results: Vec<ImageCandidate>) -> Self {
        self.by_query
            .lock()
            .unwrap()
            .insert(query.to_string(), Ok(results));
        self
    }

    /// Make one query fail
    pub fn with_error(self, query: &str) -> Self {
        self.by_query
            .lock()
            .unwrap()
            .insert(query.to_string(), Err("mock search failure".to_string()));
        self
    }

    /// Results for every query without an explicit entry
    pub fn with_default_results(self, results: Vec<ImageCandidate>) -> Self {
        *self.fallback.lock().unwrap() = results;
        self
    }

    /// `count` distinct photos with ids `img-0`, `img-1`, ...
    pub fn with_stock(self, count: usize) -> Self {
        let results = (0..count).map(|i| stock_image(&format!("img-{i}"))).collect();
        self.with_default_results(results)
    }

    /// Query texts in call order
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

impl Default for MockImageSearch {
    fn default() -> Self {
        Self::new()
    }
}

/// Photo candidate with a predictable URL.
pub fn stock_image(id: &str) -> ImageCandidate {
    ImageCandidate {
        id: id.to_string(),
        url: format!("https://images.example/{id}.jpg"),
        description: None,
    }
}

#[async_trait]
impl BaseImageSearch for MockImageSearch {
    async fn search(&self, query: ImageQuery<'_>) -> Result<Vec<ImageCandidate>> {
        self.queries.lock().unwrap().push(query.text.to_string());

        match self.by_query.lock().unwrap().get(query.text) {
            Some(Ok(results)) => Ok(results.clone()),
            Some(Err(message)) => bail!("{}", message),
            None => Ok(self.fallback.lock().unwrap().clone()),
        }
    }
}

// =============================================================================
// Mock Notifier
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentNotification {
    pub destination: String,
    pub text: String,
    pub image_url: Option<String>,
}

pub struct MockNotifier {
    sent: Arc<Mutex<Vec<SentNotification>>>,
    failing: AtomicBool,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            failing: AtomicBool::new(false),
        }
    }

    /// Start out rejecting every send
    pub fn failing() -> Self {
        let notifier = Self::new();
        notifier.set_failing(true);
        notifier
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Successful sends only
    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseNotifier for MockNotifier {
    async fn send(&self, destination: &str, text: &str, image_url: Option<&str>) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            bail!("mock notifier unavailable");
        }
        self.sent.lock().unwrap().push(SentNotification {
            destination: destination.to_string(),
            text: text.to_string(),
            image_url: image_url.map(String::from),
        });
        Ok(())
    }

    async fn check_destination(&self, destination: &str) -> Result<String> {
        if self.failing.load(Ordering::SeqCst) {
            bail!("mock notifier unavailable");
        }
        Ok(format!("Mock chat {destination}"))
    }
}

// =============================================================================
// In-memory Blog Store
// =============================================================================

/// BlogStore over plain collections, with the same slug uniqueness and
/// transition rules as the Postgres store.
#[derive(Default)]
pub struct InMemoryBlogStore {
    posts: Mutex<Vec<BlogPost>>,
    image_usage: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl InMemoryBlogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an existing post
    pub fn with_post(self, post: BlogPost) -> Self {
        self.posts.lock().unwrap().push(post);
        self
    }

    /// Seed an image-usage row
    pub fn with_image_usage(self, image_id: &str, used_at: DateTime<Utc>) -> Self {
        self.image_usage
            .lock()
            .unwrap()
            .insert(image_id.to_string(), used_at);
        self
    }

    pub fn posts(&self) -> Vec<BlogPost> {
        self.posts.lock().unwrap().clone()
    }

    pub fn post(&self, id: BlogPostId) -> Option<BlogPost> {
        self.posts.lock().unwrap().iter().find(|p| p.id == id).cloned()
    }

    pub fn image_usage(&self) -> HashMap<String, DateTime<Utc>> {
        self.image_usage.lock().unwrap().clone()
    }
}

/// A post row as it would come back from the database.
pub fn blog_post_fixture(
    slug: &str,
    status: BlogPostStatus,
    published_at: DateTime<Utc>,
) -> BlogPost {
    BlogPost {
        id: BlogPostId::new(),
        title: format!("Post {slug}"),
        slug: slug.to_string(),
        content: "Mazmun".to_string(),
        excerpt: "Qisqacha mazmun".to_string(),
        meta_description: "Meta".to_string(),
        keywords: "ai, bot".to_string(),
        image_url: format!("https://images.example/{slug}.jpg"),
        image_provider_id: format!("photo-{slug}"),
        category: "Telegram Botlar".to_string(),
        read_time: 5,
        published_at: Some(published_at),
        status,
        telegram_posted: false,
        created_at: Utc::now(),
    }
}

#[async_trait]
impl BlogStore for InMemoryBlogStore {
    async fn insert_post(&self, new: NewBlogPost) -> Result<BlogPost> {
        let mut posts = self.posts.lock().unwrap();
        if posts.iter().any(|p| p.slug == new.slug) {
            bail!("slug already taken: {}", new.slug);
        }

        let post = BlogPost {
            id: new.id,
            title: new.title,
            slug: new.slug,
            content: new.content,
            excerpt: new.excerpt,
            meta_description: new.meta_description,
            keywords: new.keywords,
            image_url: new.image_url,
            image_provider_id: new.image_provider_id,
            category: new.category,
            read_time: new.read_time,
            published_at: Some(new.published_at),
            status: new.status,
            telegram_posted: false,
            created_at: Utc::now(),
        };
        posts.push(post.clone());
        Ok(post)
    }

    async fn mark_published(&self, id: BlogPostId, now: DateTime<Utc>) -> Result<bool> {
        let mut posts = self.posts.lock().unwrap();
        let Some(post) = posts.iter_mut().find(|p| p.id == id) else {
            return Ok(false);
        };
        let due = post.published_at.is_some_and(|at| at <= now);
        if post.status != BlogPostStatus::Scheduled || !due {
            return Ok(false);
        }
        post.status = BlogPostStatus::Published;
        Ok(true)
    }

    async fn mark_announced(&self, id: BlogPostId) -> Result<()> {
        if let Some(post) = self.posts.lock().unwrap().iter_mut().find(|p| p.id == id) {
            post.telegram_posted = true;
        }
        Ok(())
    }

    async fn find_due_scheduled(&self, now: DateTime<Utc>) -> Result<Vec<BlogPost>> {
        let mut due: Vec<BlogPost> = self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.status == BlogPostStatus::Scheduled)
            .filter(|p| p.published_at.is_some_and(|at| at <= now))
            .cloned()
            .collect();
        due.sort_by_key(|p| p.published_at);
        Ok(due)
    }

    async fn find_unannounced_published(&self) -> Result<Vec<BlogPost>> {
        let mut pending: Vec<BlogPost> = self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.status == BlogPostStatus::Published && !p.telegram_posted)
            .cloned()
            .collect();
        pending.sort_by_key(|p| p.published_at);
        Ok(pending)
    }

    async fn upsert_image_usage(&self, image_id: &str, used_at: DateTime<Utc>) -> Result<()> {
        self.image_usage
            .lock()
            .unwrap()
            .insert(image_id.to_string(), used_at);
        Ok(())
    }

    async fn used_image_ids_since(&self, since: DateTime<Utc>) -> Result<Vec<String>> {
        Ok(self
            .image_usage
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, used_at)| **used_at >= since)
            .map(|(id, _)| id.clone())
            .collect())
    }

    async fn count_created_since(&self, since: DateTime<Utc>) -> Result<i64> {
        let count = self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.created_at >= since)
            .count();
        Ok(count as i64)
    }

    async fn list_published(&self, limit: i64) -> Result<Vec<BlogPost>> {
        let mut published: Vec<BlogPost> = self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.status == BlogPostStatus::Published)
            .cloned()
            .collect();
        published.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        published.truncate(limit.max(0) as usize);
        Ok(published)
    }

    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<BlogPost>> {
        Ok(self
            .posts
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.slug == slug && p.status == BlogPostStatus::Published)
            .cloned())
    }
}

// =============================================================================
// Test Dependencies Builder
// =============================================================================

/// Test blog channel used by `TestDependencies::new`
pub const TEST_BLOG_CHANNEL: &str = "@evolvo_test";

/// Test admin channel used by `TestDependencies::new`
pub const TEST_ADMIN_CHANNEL: &str = "-1001234567890";

pub struct TestDependencies {
    pub blog_store: Arc<InMemoryBlogStore>,
    pub ai: Arc<MockAI>,
    pub image_search: Arc<MockImageSearch>,
    pub notifier: Arc<MockNotifier>,
    pub publishing: PublishingSettings,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            blog_store: Arc::new(InMemoryBlogStore::new()),
            ai: Arc::new(MockAI::new()),
            image_search: Arc::new(MockImageSearch::new()),
            notifier: Arc::new(MockNotifier::new()),
            publishing: PublishingSettings {
                blog_channel_id: Some(TEST_BLOG_CHANNEL.to_string()),
                admin_channel_id: Some(TEST_ADMIN_CHANNEL.to_string()),
                ..PublishingSettings::default()
            },
        }
    }

    pub fn mock_store(mut self, store: InMemoryBlogStore) -> Self {
        self.blog_store = Arc::new(store);
        self
    }

    /// Set a mock AI
    pub fn mock_ai(mut self, ai: MockAI) -> Self {
        self.ai = Arc::new(ai);
        self
    }

    pub fn mock_images(mut self, search: MockImageSearch) -> Self {
        self.image_search = Arc::new(search);
        self
    }

    pub fn mock_notifier(mut self, notifier: MockNotifier) -> Self {
        self.notifier = Arc::new(notifier);
        self
    }

    pub fn publishing(mut self, publishing: PublishingSettings) -> Self {
        self.publishing = publishing;
        self
    }

    /// ServerDeps sharing these mocks; the builder keeps its handles for
    /// assertions.
    pub fn server_deps(&self) -> ServerDeps {
        ServerDeps::new(
            self.blog_store.clone(),
            self.ai.clone(),
            self.image_search.clone(),
            self.notifier.clone(),
            self.publishing.clone(),
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
