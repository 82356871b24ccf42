pub mod activities;
pub mod category;
pub mod models;
pub mod store;

pub use activities::{GenerationReport, ScheduleMode, SweepReport};
pub use category::{BlogCategory, FALLBACK_IMAGE_QUERY};
pub use models::{BlogPost, BlogPostStatus, ImageUsage, NewBlogPost};
pub use store::{BlogStore, PgBlogStore};
