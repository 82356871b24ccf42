//! Server dependencies for activities (using traits for testability)
//!
//! This module provides the central dependency container used by the blog
//! pipeline and the HTTP handlers. All external services sit behind trait
//! abstractions so tests can swap in mocks.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use telegram::TelegramService;
use unsplash_client::UnsplashClient;

use crate::domains::blog::{BlogStore, ScheduleMode};
use crate::kernel::{BaseAI, BaseImageSearch, BaseNotifier, ImageCandidate, ImageQuery};

// =============================================================================
// UnsplashClient Adapter (implements BaseImageSearch trait)
// =============================================================================

pub struct UnsplashAdapter(pub Arc<UnsplashClient>);

impl UnsplashAdapter {
    pub fn new(client: Arc<UnsplashClient>) -> Self {
        Self(client)
    }
}

#[async_trait]
impl BaseImageSearch for UnsplashAdapter {
    async fn search(&self, query: ImageQuery<'_>) -> Result<Vec<ImageCandidate>> {
        let photos = self
            .0
            .search_photos(query.text, query.per_page, query.orientation)
            .await
            .with_context(|| format!("image search failed for {:?}", query.text))?;

        Ok(photos
            .into_iter()
            .map(|photo| ImageCandidate {
                description: photo.caption().map(String::from),
                id: photo.id,
                url: photo.urls.regular,
            })
            .collect())
    }
}

// =============================================================================
// TelegramService Adapter (implements BaseNotifier trait)
// =============================================================================

/// Wrapper around TelegramService that implements BaseNotifier trait
pub struct TelegramAdapter(pub Arc<TelegramService>);

impl TelegramAdapter {
    pub fn new(service: Arc<TelegramService>) -> Self {
        Self(service)
    }
}

#[async_trait]
impl BaseNotifier for TelegramAdapter {
    async fn send(&self, destination: &str, text: &str, image_url: Option<&str>) -> Result<()> {
        match image_url {
            Some(url) => self
                .0
                .send_photo(destination, url, text)
                .await
                .with_context(|| format!("sendPhoto to {destination} failed"))?,
            None => self
                .0
                .send_message(destination, text)
                .await
                .with_context(|| format!("sendMessage to {destination} failed"))?,
        };
        Ok(())
    }

    async fn check_destination(&self, destination: &str) -> Result<String> {
        let chat = self
            .0
            .get_chat(destination)
            .await
            .with_context(|| format!("getChat for {destination} failed"))?;
        Ok(chat
            .title
            .or(chat.username)
            .unwrap_or_else(|| chat.id.to_string()))
    }
}

// =============================================================================
// Publishing settings
// =============================================================================

/// Non-secret knobs the blog pipeline reads at run time.
#[derive(Debug, Clone)]
pub struct PublishingSettings {
    pub schedule_mode: ScheduleMode,
    /// Base for article links, without trailing slash
    pub site_url: String,
    pub blog_channel_id: Option<String>,
    pub admin_channel_id: Option<String>,
}

impl Default for PublishingSettings {
    fn default() -> Self {
        Self {
            schedule_mode: ScheduleMode::Daily,
            site_url: "https://evolvo.uz".to_string(),
            blog_channel_id: None,
            admin_channel_id: None,
        }
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to activities (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    pub blog_store: Arc<dyn BlogStore>,
    pub ai: Arc<dyn BaseAI>,
    pub image_search: Arc<dyn BaseImageSearch>,
    pub notifier: Arc<dyn BaseNotifier>,
    pub publishing: PublishingSettings,
}

impl ServerDeps {
    pub fn new(
        blog_store: Arc<dyn BlogStore>,
        ai: Arc<dyn BaseAI>,
        image_search: Arc<dyn BaseImageSearch>,
        notifier: Arc<dyn BaseNotifier>,
        publishing: PublishingSettings,
    ) -> Self {
        Self {
            blog_store,
            ai,
            image_search,
            notifier,
            publishing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use telegram::{TelegramError, TelegramOptions};

    fn unconfigured_telegram() -> TelegramAdapter {
        TelegramAdapter::new(Arc::new(TelegramService::new(TelegramOptions {
            bot_token: String::new(),
        })))
    }

    #[tokio::test]
    async fn send_failure_keeps_telegram_error_as_source() {
        let err = unconfigured_telegram()
            .send("@evolvo", "Salom", Some("https://images.example/a.jpg"))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("sendPhoto to @evolvo"));
        let source = err.downcast_ref::<TelegramError>();
        assert!(matches!(source, Some(TelegramError::Config(_))), "{err:?}");
    }

    #[tokio::test]
    async fn destination_check_keeps_telegram_error_as_source() {
        let err = unconfigured_telegram()
            .check_destination("@evolvo")
            .await
            .unwrap_err();

        assert!(err.chain().any(|cause| cause.is::<TelegramError>()));
    }
}
