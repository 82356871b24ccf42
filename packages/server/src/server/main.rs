// Main entry point for API server

use std::sync::Arc;

use anyhow::{Context, Result};
use server_core::kernel::{start_scheduler, BaseNotifier};
use server_core::server::{build_app, build_server_deps, AppState};
use server_core::{Config, SchedulerMode};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Evolvo.uz API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        scheduler_mode = ?config.scheduler_mode,
        blog_schedule_mode = ?config.blog_schedule_mode,
        "Configuration loaded"
    );

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Run migrations
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations complete");

    let deps = build_server_deps(pool.clone(), &config);

    check_telegram_destinations(deps.notifier.as_ref(), &config).await;

    // Keep the scheduler alive for the lifetime of the server
    let _scheduler = match config.scheduler_mode {
        SchedulerMode::Internal => Some(
            start_scheduler(deps.clone())
                .await
                .context("Failed to start scheduled tasks")?,
        ),
        SchedulerMode::Webhook => {
            tracing::info!("Webhook scheduler mode: waiting for external trigger calls");
            None
        }
    };

    if config.trigger_secret.is_none() {
        tracing::warn!("TRIGGER_SECRET not set, trigger endpoints are unauthenticated");
    }
    if config.admin_api_token.is_none() {
        tracing::warn!("ADMIN_API_TOKEN not set, admin endpoints will reject every request");
    }

    let state = AppState {
        db_pool: pool,
        deps: Arc::new(deps),
    };
    let app = build_app(
        state,
        config.trigger_secret.clone(),
        config.admin_api_token.clone(),
    );

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/api/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Log whether the bot can reach the configured channels. Never fatal.
async fn check_telegram_destinations(notifier: &dyn BaseNotifier, config: &Config) {
    if config.telegram_bot_token.is_none() {
        tracing::warn!("TELEGRAM_BOT_TOKEN not set, blog announcements and order notifications are disabled");
        return;
    }

    let channels = [
        ("blog", config.telegram_channel_id.as_deref()),
        ("admin", config.telegram_admin_channel_id.as_deref()),
    ];

    for (role, channel) in channels {
        let Some(channel) = channel else {
            tracing::warn!(role, "Telegram channel not configured");
            continue;
        };
        match notifier.check_destination(channel).await {
            Ok(name) => tracing::info!(role, channel, name = %name, "Telegram channel reachable"),
            Err(e) => tracing::error!(role, channel, error = %e, "Telegram channel check failed"),
        }
    }
}
