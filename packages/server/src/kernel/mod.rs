//! Kernel module - server infrastructure and dependencies.

pub mod ai;
pub mod deps;
pub mod scheduled_tasks;
pub mod test_dependencies;
pub mod traits;

pub use ai::{retry_on_overload, AiOutcome, GeminiAI, BASE_RETRY_DELAY, MAX_OVERLOAD_RETRIES};
pub use deps::{PublishingSettings, ServerDeps, TelegramAdapter, UnsplashAdapter};
pub use scheduled_tasks::start_scheduler;
pub use test_dependencies::TestDependencies;
pub use traits::*;
