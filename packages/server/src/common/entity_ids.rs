//! Typed ID definitions for all persisted entities.
//!
//! ```rust
//! use server_core::common::{BlogPostId, ServiceId};
//!
//! let post_id = BlogPostId::new();
//! let service_id = ServiceId::new();
//! // let wrong: ServiceId = post_id; // compile error
//! ```

pub use super::id::Id;

/// Marker type for blog posts.
pub struct BlogPost;

/// Marker type for catalogue services.
pub struct Service;

/// Marker type for client orders.
pub struct Order;

/// Marker type for CRM client records.
pub struct Client;

/// Marker type for portfolio showcase items.
pub struct PortfolioItem;

pub type BlogPostId = Id<BlogPost>;

pub type ServiceId = Id<Service>;

pub type OrderId = Id<Order>;

pub type ClientId = Id<Client>;

pub type PortfolioItemId = Id<PortfolioItem>;
