//! Answer a visitor's question about a service.

use anyhow::Result;
use tracing::info;

use crate::domains::services::Service;
use crate::kernel::{retry_on_overload, AiOutcome, BaseAI};

fn explain_prompt(service: &Service, question: &str) -> String {
    let seed = service.ai_prompt_template.replace("{service}", &service.title);
    format!(
        "{seed}\n\nFoydalanuvchi savoli: {question}\n\nJavobni o'zbek tilida bering va mijozga yordamchi bo'lish uchun savollar bering. Javob do'stona va professional bo'lsin."
    )
}

/// Ask the model about `service`. Overload is retried; the answer may be
/// empty, which callers should treat as no answer.
pub async fn explain_service(
    ai: &dyn BaseAI,
    service: &Service,
    question: &str,
) -> Result<AiOutcome<String>> {
    let prompt = explain_prompt(service, question);
    let prompt = prompt.as_str();

    let outcome = retry_on_overload(&service.title, || ai.complete(prompt)).await?;
    if let AiOutcome::Ready(answer) = &outcome {
        info!(service = %service.title, chars = answer.len(), "Generated service explanation");
    }
    Ok(outcome)
}
