// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// What to prompt for, which image to pick and how to word an announcement
// live in the domain layer and are written against these traits.
//
// Naming convention: Base* for trait names (e.g., BaseAI, BaseNotifier)

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

pub use unsplash_client::Orientation;

// =============================================================================
// AI Trait (Infrastructure - generative text)
// =============================================================================

/// Failure modes of a generative text call.
///
/// `Overloaded` is the only retryable condition; everything else is final
/// for the request that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AiError {
    #[error("AI provider temporarily overloaded")]
    Overloaded,

    #[error("AI provider error: {0}")]
    Provider(String),
}

#[async_trait]
pub trait BaseAI: Send + Sync {
    /// Complete a prompt (returns raw text response)
    async fn complete(&self, prompt: &str) -> Result<String, AiError>;

    /// Complete a prompt whose answer must match `schema`
    /// (returns raw JSON string; parse in calling code)
    async fn generate_structured(
        &self,
        prompt: &str,
        schema: serde_json::Value,
    ) -> Result<String, AiError>;
}

// =============================================================================
// Image Search Trait (Infrastructure - read only)
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCandidate {
    /// Provider-side id, used for de-duplication
    pub id: String,
    pub url: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct ImageQuery<'a> {
    pub text: &'a str,
    pub per_page: u32,
    pub orientation: Orientation,
}

#[async_trait]
pub trait BaseImageSearch: Send + Sync {
    async fn search(&self, query: ImageQuery<'_>) -> Result<Vec<ImageCandidate>>;
}

// =============================================================================
// Notification Sink Trait (Infrastructure - outbound messages)
// =============================================================================

#[async_trait]
pub trait BaseNotifier: Send + Sync {
    /// Deliver `text` to `destination`; with an image when `image_url` is set
    /// (text becomes the image caption).
    async fn send(&self, destination: &str, text: &str, image_url: Option<&str>) -> Result<()>;

    /// Check that `destination` is reachable. Returns a display name.
    async fn check_destination(&self, destination: &str) -> Result<String>;
}
