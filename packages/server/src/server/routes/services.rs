use axum::{
    extract::{Extension, Path},
    Json,
};
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use crate::common::ServiceId;
use crate::domains::services::activities::explain_service;
use crate::domains::services::Service;
use crate::kernel::AiOutcome;
use crate::server::app::AppState;

/// Shown when the model answered with nothing.
pub const EMPTY_ANSWER_MESSAGE: &str =
    "Kechirasiz, hozir javob bera olmayapman. Iltimos, keyinroq urinib ko'ring.";

/// Shown when the provider is overloaded or failing.
pub const AI_UNAVAILABLE_MESSAGE: &str = "Kechirasiz, hozir AI xizmati vaqtincha mavjud emas. Iltimos, keyinroq urinib ko'ring yoki bizga to'g'ridan-to'g'ri murojaat qiling.";

pub async fn list_services_handler(
    Extension(state): Extension<AppState>,
) -> Result<Json<Vec<Service>>, ApiError> {
    Service::list_active(&state.db_pool)
        .await
        .map(Json)
        .map_err(|e| ApiError::internal("Failed to fetch services", e))
}

pub async fn get_service_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Service>, ApiError> {
    let id: ServiceId = id
        .parse()
        .map_err(|_| ApiError::not_found("Service not found"))?;

    Service::find_active_by_id(id, &state.db_pool)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch service", e))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Service not found"))
}

#[derive(Debug, Deserialize)]
pub struct ExplainRequest {
    #[serde(alias = "serviceId")]
    pub service_id: Option<String>,
    pub question: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExplainResponse {
    pub explanation: String,
}

/// Answer a question about a service; AI trouble becomes a friendly message.
pub async fn explain_handler(
    Extension(state): Extension<AppState>,
    Json(request): Json<ExplainRequest>,
) -> Result<Json<ExplainResponse>, ApiError> {
    let (Some(service_id), Some(question)) = (
        request.service_id.filter(|s| !s.trim().is_empty()),
        request.question.filter(|q| !q.trim().is_empty()),
    ) else {
        return Err(ApiError::bad_request("Service ID and question are required"));
    };

    let service_id: ServiceId = service_id
        .parse()
        .map_err(|_| ApiError::not_found("Service not found"))?;
    let service = Service::find_active_by_id(service_id, &state.db_pool)
        .await
        .map_err(|e| ApiError::internal("Failed to generate explanation", e))?
        .ok_or_else(|| ApiError::not_found("Service not found"))?;

    let explanation = match explain_service(state.deps.ai.as_ref(), &service, &question).await {
        Ok(AiOutcome::Ready(answer)) if !answer.trim().is_empty() => answer,
        Ok(AiOutcome::Ready(_)) => EMPTY_ANSWER_MESSAGE.to_string(),
        Ok(AiOutcome::ProviderUnavailable) => AI_UNAVAILABLE_MESSAGE.to_string(),
        Err(e) => {
            tracing::error!(service = %service.title, error = %e, "Service explanation failed");
            AI_UNAVAILABLE_MESSAGE.to_string()
        }
    };

    Ok(Json(ExplainResponse { explanation }))
}
