//! Scheduled background tasks using tokio-cron-scheduler.
//!
//! Only started when `SCHEDULER_MODE=internal`; in webhook mode an external
//! caller drives the same two operations over HTTP.
//!
//! ```text
//! Scheduler (18:00 UTC = 23:00 Tashkent)
//!     └─► run_daily_generation(skip_if_already_ran_today = true)
//!
//! Scheduler (every minute)
//!     └─► publish_due_posts()   (skipped while the previous sweep runs)
//! ```

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::domains::blog::activities::{publish_due_posts, run_daily_generation};
use crate::kernel::ServerDeps;

/// Daily generation, seconds-resolution cron in UTC.
pub const DAILY_GENERATION_CRON: &str = "0 0 18 * * *";

/// Publication sweep.
pub const PUBLISH_SWEEP_CRON: &str = "0 * * * * *";

/// Start all scheduled tasks
pub async fn start_scheduler(deps: ServerDeps) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let generation_deps = deps.clone();
    let generation_job = Job::new_async(DAILY_GENERATION_CRON, move |_uuid, _lock| {
        let deps = generation_deps.clone();
        Box::pin(async move {
            match run_daily_generation(&deps, true).await {
                Ok(report) => tracing::info!(?report, "Scheduled daily generation finished"),
                Err(e) => tracing::error!("Daily generation task failed: {}", e),
            }
        })
    })?;

    scheduler.add(generation_job).await?;

    let sweep_deps = deps;
    let sweep_running = Arc::new(Mutex::new(()));
    let sweep_job = Job::new_async(PUBLISH_SWEEP_CRON, move |_uuid, _lock| {
        let deps = sweep_deps.clone();
        let running = sweep_running.clone();
        Box::pin(async move {
            let Ok(_guard) = running.try_lock() else {
                tracing::debug!("Previous publication sweep still running, skipping");
                return;
            };
            if let Err(e) = publish_due_posts(&deps).await {
                tracing::error!("Publication sweep failed: {}", e);
            }
        })
    })?;

    scheduler.add(sweep_job).await?;
    scheduler.start().await?;

    tracing::info!(
        generation = DAILY_GENERATION_CRON,
        sweep = PUBLISH_SWEEP_CRON,
        "Scheduled tasks started"
    );
    Ok(scheduler)
}
