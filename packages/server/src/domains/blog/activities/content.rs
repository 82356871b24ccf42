//! Article body generation.

use anyhow::{Context, Result};
use gemini_client::StructuredOutput;
use schemars::JsonSchema;
use serde::Deserialize;

use super::super::BlogCategory;
use crate::kernel::{retry_on_overload, AiOutcome, BaseAI};

// =============================================================================
// LLM Response Types
// =============================================================================

/// Structured answer requested from the model.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPost {
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub meta_description: String,
    /// Comma separated
    pub keywords: String,
    /// Minutes
    pub read_time: f64,
}

/// A generated article ready to be scheduled.
#[derive(Debug, Clone, PartialEq)]
pub struct PostContent {
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub meta_description: String,
    pub keywords: String,
    pub read_time: i32,
}

impl From<GeneratedPost> for PostContent {
    fn from(post: GeneratedPost) -> Self {
        Self {
            title: post.title,
            content: post.content,
            excerpt: post.excerpt,
            meta_description: post.meta_description,
            keywords: post.keywords,
            read_time: whole_minutes(post.read_time),
        }
    }
}

fn whole_minutes(minutes: f64) -> i32 {
    if minutes.is_finite() {
        (minutes.round() as i32).max(1)
    } else {
        1
    }
}

// =============================================================================
// LLM Prompt
// =============================================================================

fn post_prompt(topic: &str, category: BlogCategory) -> String {
    format!(
        r#"O'zbek tilida {category} mavzusida "{topic}" haqida blog maqola yozing.

Quyidagi formatda javob bering:
- Sarlavha: qiziqarli va SEO-ga mos
- Mazmun: kamida 800 so'z, foydali ma'lumotlar bilan
- Qisqacha: 150-200 so'z
- Meta tavsif: 150-160 belgi
- Kalit so'zlar: 5-7 ta kalit so'z vergul bilan ajratilgan
- O'qish vaqti: daqiqa hisobida

Mazmun professional va qimmatli bo'lsin, real ma'lumotlar va maslahatlar bering."#
    )
}

/// Generate one article, retrying while the provider is overloaded.
///
/// `ProviderUnavailable` means the retries ran out; any other provider
/// error or an unparseable answer is returned as an error.
pub async fn generate_post(
    ai: &dyn BaseAI,
    topic: &str,
    category: BlogCategory,
) -> Result<AiOutcome<PostContent>> {
    let prompt = post_prompt(topic, category);
    let prompt = prompt.as_str();
    let schema = GeneratedPost::gemini_schema();

    let outcome = retry_on_overload(topic, || ai.generate_structured(prompt, schema.clone()))
        .await
        .with_context(|| format!("post generation failed for topic: {}", topic))?;

    match outcome {
        AiOutcome::Ready(raw) => {
            let post: GeneratedPost = serde_json::from_str(&raw)
                .with_context(|| format!("malformed post JSON for topic: {}", topic))?;
            Ok(AiOutcome::Ready(post.into()))
        }
        AiOutcome::ProviderUnavailable => Ok(AiOutcome::ProviderUnavailable),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_time_rounds_to_whole_minutes() {
        assert_eq!(whole_minutes(6.4), 6);
        assert_eq!(whole_minutes(6.5), 7);
        assert_eq!(whole_minutes(0.2), 1);
        assert_eq!(whole_minutes(f64::NAN), 1);
    }

    #[test]
    fn provider_json_uses_camel_case_keys() {
        let raw = r#"{
            "title": "Sarlavha",
            "content": "Mazmun",
            "excerpt": "Qisqacha",
            "metaDescription": "Meta",
            "keywords": "ai, bot",
            "readTime": 5
        }"#;
        let post: PostContent = serde_json::from_str::<GeneratedPost>(raw).unwrap().into();
        assert_eq!(post.meta_description, "Meta");
        assert_eq!(post.read_time, 5);
    }

    #[test]
    fn schema_requires_every_field() {
        let schema = GeneratedPost::gemini_schema();
        let required = schema["required"].as_array().unwrap();
        for key in ["title", "content", "excerpt", "metaDescription", "keywords", "readTime"] {
            assert!(required.iter().any(|v| v == key), "{key} missing");
        }
    }

    #[test]
    fn prompt_names_topic_and_category() {
        let prompt = post_prompt("Chatbotlar", BlogCategory::TelegramBots);
        assert!(prompt.contains("\"Chatbotlar\""));
        assert!(prompt.contains("Telegram Botlar mavzusida"));
    }
}
