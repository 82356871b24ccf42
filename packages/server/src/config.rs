use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use std::env;

use crate::domains::blog::ScheduleMode;

/// How the two blog triggers are driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerMode {
    /// In-process cron jobs (local / single long-lived process)
    Internal,
    /// External caller hits the trigger endpoints (hosted, survives restarts)
    Webhook,
}

impl std::str::FromStr for SchedulerMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "internal" => Ok(SchedulerMode::Internal),
            "webhook" => Ok(SchedulerMode::Webhook),
            other => bail!("Invalid SCHEDULER_MODE: {} (expected internal|webhook)", other),
        }
    }
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub unsplash_access_key: String,
    pub telegram_bot_token: Option<String>,
    pub telegram_channel_id: Option<String>,
    pub telegram_admin_channel_id: Option<String>,
    pub site_url: String,
    pub trigger_secret: Option<String>,
    /// Bearer token for `/api/admin/*`; admin API is off when unset
    pub admin_api_token: Option<String>,
    pub scheduler_mode: SchedulerMode,
    pub blog_schedule_mode: ScheduleMode,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            gemini_api_key: env::var("GEMINI_API_KEY").context("GEMINI_API_KEY must be set")?,
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| gemini_client::GEMINI_2_5_FLASH.to_string()),
            unsplash_access_key: env::var("UNSPLASH_ACCESS_KEY")
                .context("UNSPLASH_ACCESS_KEY must be set")?,
            telegram_bot_token: optional("TELEGRAM_BOT_TOKEN"),
            telegram_channel_id: optional("TELEGRAM_CHANNEL_ID"),
            telegram_admin_channel_id: optional("TELEGRAM_ADMIN_CHANNEL_ID"),
            site_url: env::var("SITE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "https://evolvo.uz".to_string()),
            trigger_secret: optional("TRIGGER_SECRET"),
            admin_api_token: optional("ADMIN_API_TOKEN"),
            scheduler_mode: env::var("SCHEDULER_MODE")
                .unwrap_or_else(|_| "webhook".to_string())
                .parse()?,
            blog_schedule_mode: env::var("BLOG_SCHEDULE_MODE")
                .unwrap_or_else(|_| "daily".to_string())
                .parse()?,
        })
    }
}

/// Unset and blank variables are both treated as missing.
fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
