// AI implementation using Gemini
//
// This is the infrastructure implementation of BaseAI plus the shared
// overload retry policy. Business logic (what to prompt for) lives in
// domain layers.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use gemini_client::{GeminiClient, GeminiError};
use tracing::warn;

use super::{AiError, BaseAI};

/// Retries after the first overloaded attempt (delays 2s, 4s, 8s).
pub const MAX_OVERLOAD_RETRIES: u32 = 3;

/// First backoff delay; doubles on every retry.
pub const BASE_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Result of an AI call once overload retries are spent.
///
/// `ProviderUnavailable` is not an error: the caller chooses whether to skip
/// the item, show a fallback message or propagate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AiOutcome<T> {
    Ready(T),
    ProviderUnavailable,
}

/// Run `call`, retrying only on [`AiError::Overloaded`] with exponential
/// backoff. Any other error is returned immediately.
pub async fn retry_on_overload<T, F, Fut>(label: &str, mut call: F) -> Result<AiOutcome<T>, AiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AiError>>,
{
    let mut retries = 0;

    loop {
        match call().await {
            Ok(value) => return Ok(AiOutcome::Ready(value)),
            Err(AiError::Overloaded) if retries < MAX_OVERLOAD_RETRIES => {
                let delay = BASE_RETRY_DELAY * 2u32.pow(retries);
                retries += 1;
                warn!(
                    label,
                    retry = retries,
                    max_retries = MAX_OVERLOAD_RETRIES,
                    delay_secs = delay.as_secs(),
                    "AI provider overloaded, backing off"
                );
                tokio::time::sleep(delay).await;
            }
            Err(AiError::Overloaded) => {
                warn!(label, "AI provider still overloaded after all retries");
                return Ok(AiOutcome::ProviderUnavailable);
            }
            Err(e) => return Err(e),
        }
    }
}

/// Gemini implementation of BaseAI
#[derive(Clone)]
pub struct GeminiAI {
    client: GeminiClient,
}

impl GeminiAI {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: GeminiClient::new(api_key).with_model(model),
        }
    }
}

impl From<GeminiError> for AiError {
    fn from(e: GeminiError) -> Self {
        match e {
            GeminiError::Overloaded(_) => AiError::Overloaded,
            other => AiError::Provider(other.to_string()),
        }
    }
}

#[async_trait]
impl BaseAI for GeminiAI {
    async fn complete(&self, prompt: &str) -> Result<String, AiError> {
        Ok(self.client.generate_text(prompt).await?)
    }

    async fn generate_structured(
        &self,
        prompt: &str,
        schema: serde_json::Value,
    ) -> Result<String, AiError> {
        Ok(self.client.generate_json(prompt, schema).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn success_on_first_attempt_does_not_sleep() {
        let start = Instant::now();
        let outcome = retry_on_overload("test", || async { Ok::<_, AiError>(7) })
            .await
            .unwrap();

        assert_eq!(outcome, AiOutcome::Ready(7));
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn one_overload_then_success_waits_two_seconds() {
        let attempts = AtomicU32::new(0);
        let start = Instant::now();

        let outcome = retry_on_overload("test", || {
            let n = attempts.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(AiError::Overloaded)
                } else {
                    Ok("done")
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(outcome, AiOutcome::Ready("done"));
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
        let waited = start.elapsed();
        assert!(waited >= Duration::from_secs(2) && waited < Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn persistent_overload_is_provider_unavailable_after_backoff() {
        let attempts = AtomicU32::new(0);
        let start = Instant::now();

        let outcome: AiOutcome<()> = retry_on_overload("test", || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err(AiError::Overloaded) }
        })
        .await
        .unwrap();

        assert_eq!(outcome, AiOutcome::ProviderUnavailable);
        assert_eq!(attempts.load(Ordering::SeqCst), 1 + MAX_OVERLOAD_RETRIES);
        // 2s + 4s + 8s
        let waited = start.elapsed();
        assert!(waited >= Duration::from_secs(14) && waited < Duration::from_secs(15));
    }

    #[tokio::test(start_paused = true)]
    async fn hard_failure_is_not_retried() {
        let attempts = AtomicU32::new(0);

        let result: Result<AiOutcome<()>, AiError> = retry_on_overload("test", || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err(AiError::Provider("bad request".into())) }
        })
        .await;

        assert_eq!(result, Err(AiError::Provider("bad request".into())));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn gemini_503_maps_to_overloaded() {
        assert_eq!(
            AiError::from(GeminiError::Overloaded("busy".into())),
            AiError::Overloaded
        );
        assert!(matches!(
            AiError::from(GeminiError::Api { status: 400, message: "x".into() }),
            AiError::Provider(_)
        ));
    }
}
