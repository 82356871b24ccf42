//! Pure Unsplash REST API client.
//!
//! Read-only: searches photos. No domain logic.
//!
//! # Example
//!
//! ```rust,ignore
//! use unsplash_client::{Orientation, UnsplashClient};
//!
//! let client = UnsplashClient::new("access-key".into());
//! let photos = client.search_photos("web development", 30, Orientation::Landscape).await?;
//! ```

pub mod error;
pub mod types;

pub use error::{Result, UnsplashError};
pub use types::{Orientation, Photo, PhotoUrls, PhotoUser, SearchResponse};

const BASE_URL: &str = "https://api.unsplash.com";

/// Unsplash caps `per_page` at 30.
pub const MAX_PER_PAGE: u32 = 30;

pub struct UnsplashClient {
    client: reqwest::Client,
    access_key: String,
    base_url: String,
}

impl UnsplashClient {
    pub fn new(access_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            access_key,
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Search photos matching `query`. Returns at most `per_page` results
    /// (clamped to [`MAX_PER_PAGE`]).
    pub async fn search_photos(
        &self,
        query: &str,
        per_page: u32,
        orientation: Orientation,
    ) -> Result<Vec<Photo>> {
        let per_page = per_page.clamp(1, MAX_PER_PAGE).to_string();
        let url = format!("{}/search/photos", self.base_url);

        let resp = self
            .client
            .get(&url)
            .header("Authorization", format!("Client-ID {}", self.access_key))
            .header("Accept-Version", "v1")
            .query(&[
                ("query", query),
                ("per_page", per_page.as_str()),
                ("orientation", orientation.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(UnsplashError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let search: SearchResponse = resp.json().await?;
        tracing::debug!(query, total = search.total, returned = search.results.len(), "Unsplash search");
        Ok(search.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_search_response() {
        let raw = r#"{
            "total": 2,
            "total_pages": 1,
            "results": [
                {"id": "abc", "urls": {"raw": "r", "full": "f", "regular": "https://img/abc", "small": "https://img/abc-s"},
                 "description": null, "alt_description": "a laptop on a desk", "user": {"name": "Jane"}},
                {"id": "def", "urls": {"regular": "https://img/def", "small": "https://img/def-s"},
                 "description": "Office", "alt_description": null, "user": null}
            ]
        }"#;

        let parsed: SearchResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.results.len(), 2);
        assert_eq!(parsed.results[0].id, "abc");
        assert_eq!(parsed.results[0].urls.regular, "https://img/abc");
        assert_eq!(parsed.results[0].caption(), Some("a laptop on a desk"));
        assert_eq!(parsed.results[1].caption(), Some("Office"));
    }

    #[test]
    fn orientation_query_values() {
        assert_eq!(Orientation::default().as_str(), "landscape");
        assert_eq!(Orientation::Squarish.as_str(), "squarish");
    }
}
