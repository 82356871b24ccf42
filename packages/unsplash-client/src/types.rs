use serde::{Deserialize, Serialize};

/// Photo orientation filter for search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Landscape,
    Portrait,
    Squarish,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
            Orientation::Squarish => "squarish",
        }
    }
}

/// Response of `GET /search/photos`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub results: Vec<Photo>,
}

/// A single photo from a search result.
#[derive(Debug, Clone, Deserialize)]
pub struct Photo {
    pub id: String,
    pub urls: PhotoUrls,
    pub description: Option<String>,
    pub alt_description: Option<String>,
    pub user: Option<PhotoUser>,
}

impl Photo {
    /// Best human-readable caption available.
    pub fn caption(&self) -> Option<&str> {
        self.description
            .as_deref()
            .or(self.alt_description.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhotoUrls {
    pub regular: String,
    pub small: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhotoUser {
    pub name: String,
}
