//! Error types for the Gemini client.

use thiserror::Error;

/// Result type for Gemini client operations.
pub type Result<T> = std::result::Result<T, GeminiError>;

/// Gemini client errors.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// Configuration error (missing API key, invalid settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error (connection failed, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// The model is temporarily overloaded (HTTP 503). Safe to retry.
    #[error("Model temporarily overloaded: {0}")]
    Overloaded(String),

    /// API error (any other non-2xx response)
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Parse error (invalid JSON, unexpected response shape, empty candidate)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl GeminiError {
    /// Whether the caller may retry this request after backing off.
    pub fn is_overloaded(&self) -> bool {
        matches!(self, GeminiError::Overloaded(_))
    }
}
