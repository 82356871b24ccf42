//! Entry points for an external scheduler (SCHEDULER_MODE=webhook).

use axum::{extract::Extension, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::domains::blog::activities::{publish_due_posts, run_daily_generation};
use crate::server::app::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct GenerateDailyPostsRequest {
    #[serde(default)]
    pub skip_if_already_ran_today: bool,
}

#[derive(Debug, Serialize)]
pub struct GenerateDailyPostsResponse {
    pub success: bool,
    pub message: String,
    pub created: usize,
    pub skipped: usize,
    pub topics: usize,
}

#[derive(Debug, Serialize)]
pub struct PublishScheduledResponse {
    pub success: bool,
    pub message: String,
    pub published: usize,
    pub announced: usize,
    pub announce_failures: usize,
}

#[derive(Debug, Serialize)]
pub struct TriggerFailure {
    pub success: bool,
    pub message: String,
}

type TriggerResult<T> = Result<Json<T>, (StatusCode, Json<TriggerFailure>)>;

fn failure(context: &str, error: anyhow::Error) -> (StatusCode, Json<TriggerFailure>) {
    tracing::error!(error = %error, "{}", context);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(TriggerFailure {
            success: false,
            message: format!("{}: {}", context, error),
        }),
    )
}

/// Run daily generation. The body is optional.
pub async fn generate_daily_posts_handler(
    Extension(state): Extension<AppState>,
    body: Option<Json<GenerateDailyPostsRequest>>,
) -> TriggerResult<GenerateDailyPostsResponse> {
    let request = body.map(|Json(request)| request).unwrap_or_default();

    let report = run_daily_generation(&state.deps, request.skip_if_already_ran_today)
        .await
        .map_err(|e| failure("Blog generation failed", e))?;

    let message = if report.already_ran_today {
        "Blog posts already generated today, skipped".to_string()
    } else {
        format!("Created {} of {} blog posts", report.created, report.topics)
    };

    Ok(Json(GenerateDailyPostsResponse {
        success: true,
        message,
        created: report.created,
        skipped: report.skipped,
        topics: report.topics,
    }))
}

/// Run one publication sweep.
pub async fn publish_scheduled_handler(
    Extension(state): Extension<AppState>,
) -> TriggerResult<PublishScheduledResponse> {
    let report = publish_due_posts(&state.deps)
        .await
        .map_err(|e| failure("Publication sweep failed", e))?;

    Ok(Json(PublishScheduledResponse {
        success: true,
        message: format!(
            "Published {} posts, announced {}",
            report.published, report.announced
        ),
        published: report.published,
        announced: report.announced,
        announce_failures: report.announce_failures,
    }))
}
