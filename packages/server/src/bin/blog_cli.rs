//! CLI for running the blog pipeline by hand
//!
//! Runs the same operations as the trigger endpoints against the configured
//! database and providers. Outputs JSON, one object per command.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;
use server_core::config::Config;
use server_core::domains::blog::activities::{
    images::reuse_cutoff, publish_due_posts,
    publish_slots, run_daily_generation, schedule::start_of_local_day,
};
use server_core::domains::blog::ScheduleMode;
use server_core::kernel::ServerDeps;
use server_core::server::build_server_deps;
use sqlx::PgPool;

#[derive(Parser)]
#[command(name = "blog_cli")]
#[command(about = "Blog pipeline CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate and schedule today's posts
    Generate {
        /// Do nothing if posts were already created today (Tashkent time)
        #[arg(long)]
        skip_if_already_ran_today: bool,
    },

    /// Run one publication sweep
    Publish,

    /// Show pipeline counters
    Status,

    /// Print the publication slots a run started now would use (no database)
    Slots {
        #[arg(long, default_value = "daily")]
        mode: ScheduleMode,
    },
}

// ============================================================================
// JSON Response Types
// ============================================================================

#[derive(Serialize)]
struct StatusResponse {
    created_today: i64,
    due_scheduled: usize,
    unannounced_published: usize,
    images_in_reuse_window: usize,
}

fn output<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            skip_if_already_ran_today,
        } => {
            let deps = get_deps().await?;
            let report = run_daily_generation(&deps, skip_if_already_ran_today).await?;
            output(&report)
        }
        Commands::Publish => {
            let deps = get_deps().await?;
            let report = publish_due_posts(&deps).await?;
            output(&report)
        }
        Commands::Status => cmd_status(&get_deps().await?).await,
        Commands::Slots { mode } => output(&publish_slots(mode, Utc::now())),
    }
}

async fn get_deps() -> Result<ServerDeps> {
    let config = Config::from_env()?;
    let pool = PgPool::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    Ok(build_server_deps(pool, &config))
}

async fn cmd_status(deps: &ServerDeps) -> Result<()> {
    let now = Utc::now();
    let store = &deps.blog_store;

    let status = StatusResponse {
        created_today: store.count_created_since(start_of_local_day(now)).await?,
        due_scheduled: store.find_due_scheduled(now).await?.len(),
        unannounced_published: store
            .find_unannounced_published()
            .await?
            .len(),
        images_in_reuse_window: store
            .used_image_ids_since(reuse_cutoff(now))
            .await?
            .len(),
    };
    output(&status)
}
