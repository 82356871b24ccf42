use thiserror::Error;

pub type Result<T> = std::result::Result<T, UnsplashError>;

#[derive(Debug, Error)]
pub enum UnsplashError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unsplash API error ({status}): {message}")]
    Api { status: u16, message: String },
}
