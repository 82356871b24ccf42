//! Pure Gemini REST API client
//!
//! A minimal client for `models/{model}:generateContent` with no domain logic.
//! Supports free text generation and schema-constrained JSON output.
//!
//! # Example
//!
//! ```rust,ignore
//! use gemini_client::GeminiClient;
//!
//! let client = GeminiClient::from_env()?;
//!
//! let text = client.generate_text("Suggest three blog topics").await?;
//!
//! #[derive(Deserialize, JsonSchema)]
//! struct Post { title: String, content: String }
//!
//! let post: Post = client.extract("Write a post about Rust").await?;
//! ```
//!
//! A 503 from the API is surfaced as [`GeminiError::Overloaded`] so callers
//! can back off and retry; every other failure is terminal for the request.

pub mod error;
pub mod schema;
pub mod types;

pub use error::{GeminiError, Result};
pub use schema::StructuredOutput;
pub use types::*;

use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

/// Default text model.
pub const GEMINI_2_5_FLASH: &str = "gemini-2.5-flash";

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Pure Gemini API client.
#[derive(Clone)]
pub struct GeminiClient {
    http_client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a new client for the default model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            model: GEMINI_2_5_FLASH.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Create from environment variable `GEMINI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| GeminiError::Config("GEMINI_API_KEY not set".into()))?;
        Ok(Self::new(api_key))
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set a custom base URL (proxies, test servers).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Free text generation for a single prompt.
    pub async fn generate_text(&self, prompt: &str) -> Result<String> {
        let response = self
            .generate_content(GenerateContentRequest::text(prompt))
            .await?;
        Ok(response.text)
    }

    /// Schema-constrained generation. Returns the raw JSON text.
    pub async fn generate_json(&self, prompt: &str, schema: serde_json::Value) -> Result<String> {
        let response = self
            .generate_content(GenerateContentRequest::structured(prompt, schema))
            .await?;
        Ok(response.text)
    }

    /// Type-safe structured output.
    ///
    /// The response schema is derived from `T`; the answer is deserialized
    /// into `T` and any shape mismatch is a [`GeminiError::Parse`].
    pub async fn extract<T: StructuredOutput>(&self, prompt: &str) -> Result<T> {
        let schema = T::gemini_schema();

        debug!(
            type_name = T::type_name(),
            "Generated Gemini response schema for extraction"
        );

        let json = self.generate_json(prompt, schema).await?;
        serde_json::from_str(&json)
            .map_err(|e| GeminiError::Parse(format!("Failed to deserialize response: {}", e)))
    }

    /// Raw `generateContent` call.
    pub async fn generate_content(
        &self,
        request: GenerateContentRequest,
    ) -> Result<GenerateResponse> {
        let start = std::time::Instant::now();

        let response = self
            .http_client
            .post(format!(
                "{}/models/{}:generateContent",
                self.base_url, self.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Gemini request failed");
                GeminiError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "Gemini API error");

            if status == StatusCode::SERVICE_UNAVAILABLE {
                return Err(GeminiError::Overloaded(error_text));
            }
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let raw: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GeminiError::Parse(e.to_string()))?;

        let text = raw
            .text()
            .ok_or_else(|| GeminiError::Parse("No text in Gemini response".into()))?;

        debug!(
            model = %self.model,
            duration_ms = start.elapsed().as_millis(),
            "Gemini generateContent"
        );

        Ok(GenerateResponse {
            text,
            usage: raw.usage_metadata,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builder() {
        let client = GeminiClient::new("key")
            .with_model("gemini-2.5-pro")
            .with_base_url("http://localhost:9999");

        assert_eq!(client.api_key, "key");
        assert_eq!(client.model(), "gemini-2.5-pro");
        assert_eq!(client.base_url(), "http://localhost:9999");
    }

    #[test]
    fn test_default_model() {
        assert_eq!(GeminiClient::new("key").model(), GEMINI_2_5_FLASH);
    }

    #[test]
    fn test_overloaded_is_retryable() {
        assert!(GeminiError::Overloaded("busy".into()).is_overloaded());
        assert!(!GeminiError::Api {
            status: 400,
            message: "bad".into()
        }
        .is_overloaded());
    }
}
