pub mod blog_post;
pub mod image_usage;

pub use blog_post::{BlogPost, BlogPostStatus, NewBlogPost};
pub use image_usage::ImageUsage;
