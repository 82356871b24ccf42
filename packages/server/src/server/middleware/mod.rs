// HTTP middleware
pub mod admin_auth;
pub mod trigger_auth;

pub use admin_auth::*;
pub use trigger_auth::*;
