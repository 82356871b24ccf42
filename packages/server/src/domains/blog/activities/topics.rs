use anyhow::{Context, Result};
use tracing::info;

use super::schedule::POSTS_PER_RUN;
use crate::kernel::BaseAI;

const DAILY_TOPICS_PROMPT: &str = r#"7 ta turli blog maqola mavzularini o'zbek tilida taklif qiling. Mavzular quyidagi kategoriyalardan bo'lsin:
- AI vositalari va avtomatlashtirish
- Telegram botlar va chatbotlar
- Veb dasturlash va programmalashtirish
- Marketing avtomatlashtirish
- Produktivlik maslahatlar
- AI promptlar va ish oqimlari
- O'zbekiston bo'yicha innovatsiyalar

Har bir mavzu alohida qatorda bo'lsin, raqamsiz."#;

/// Ask the model for today's topics. A single attempt: a failure here aborts
/// the whole run.
pub async fn generate_topics(ai: &dyn BaseAI) -> Result<Vec<String>> {
    let text = ai
        .complete(DAILY_TOPICS_PROMPT)
        .await
        .context("topic generation failed")?;

    let topics = parse_topics(&text);
    info!(count = topics.len(), "Generated daily topics");
    Ok(topics)
}

/// One topic per non-blank line, trimmed, at most `POSTS_PER_RUN`.
pub fn parse_topics(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(POSTS_PER_RUN)
        .map(String::from)
        .collect()
}
