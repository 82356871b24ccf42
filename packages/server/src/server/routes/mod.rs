// HTTP routes
pub mod admin;
pub mod blog;
pub mod error;
pub mod health;
pub mod orders;
pub mod portfolio;
pub mod services;
pub mod triggers;

pub use admin::*;
pub use blog::*;
pub use error::ApiError;
pub use health::*;
pub use orders::*;
pub use portfolio::*;
pub use services::*;
pub use triggers::*;
