//! Blog activities: generation, scheduling, publishing and announcement.

pub mod caption;
pub mod content;
pub mod generate_daily_posts;
pub mod images;
pub mod publish_scheduled_posts;
pub mod schedule;
pub mod slug;
pub mod topics;

pub use caption::build_caption;
pub use content::{generate_post, GeneratedPost, PostContent};
pub use generate_daily_posts::{generate_daily_posts, run_daily_generation, GenerationReport};
pub use images::select_image;
pub use publish_scheduled_posts::{publish_due_posts, publish_due_posts_at, SweepReport};
pub use schedule::{publish_slots, ScheduleMode};
pub use slug::slugify;
pub use topics::{generate_topics, parse_topics};
