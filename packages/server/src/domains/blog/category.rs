use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Broad search used when none of a category's phrases yields a usable photo.
pub const FALLBACK_IMAGE_QUERY: &str = "technology business";

/// Fixed set of blog categories. Stored by display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlogCategory {
    AiAutomation,
    TelegramBots,
    WebDevelopment,
    MarketingAutomation,
    Productivity,
    AiPrompts,
    UzbekistanInnovation,
}

impl BlogCategory {
    pub const ALL: [BlogCategory; 7] = [
        BlogCategory::AiAutomation,
        BlogCategory::TelegramBots,
        BlogCategory::WebDevelopment,
        BlogCategory::MarketingAutomation,
        BlogCategory::Productivity,
        BlogCategory::AiPrompts,
        BlogCategory::UzbekistanInnovation,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            BlogCategory::AiAutomation => "AI va Avtomatlashtirish",
            BlogCategory::TelegramBots => "Telegram Botlar",
            BlogCategory::WebDevelopment => "Veb Dasturlash",
            BlogCategory::MarketingAutomation => "Marketing Avtomatlashtirish",
            BlogCategory::Productivity => "Produktivlik",
            BlogCategory::AiPrompts => "AI Promptlar",
            BlogCategory::UzbekistanInnovation => "O'zbekiston Innovatsiyalar",
        }
    }

    /// Stock photo search phrases, tried in order.
    pub fn image_queries(&self) -> &'static [&'static str] {
        match self {
            BlogCategory::AiAutomation => &[
                "artificial intelligence",
                "automation",
                "robot technology",
                "AI workspace",
            ],
            BlogCategory::TelegramBots => &[
                "telegram app",
                "mobile messaging",
                "chat interface",
                "communication",
            ],
            BlogCategory::WebDevelopment => &[
                "web development",
                "coding workspace",
                "programming",
                "computer screen",
            ],
            BlogCategory::MarketingAutomation => {
                &["digital marketing", "analytics dashboard", "business growth"]
            }
            BlogCategory::Productivity => &[
                "productivity workspace",
                "organized desk",
                "planning",
                "efficiency",
            ],
            BlogCategory::AiPrompts => &[
                "artificial intelligence",
                "neural network",
                "machine learning",
            ],
            BlogCategory::UzbekistanInnovation => &[
                "modern office",
                "innovation",
                "technology startup",
                "business meeting",
            ],
        }
    }

    /// Uniform pick over all categories.
    pub fn random() -> Self {
        *Self::ALL
            .choose(&mut rand::thread_rng())
            .unwrap_or(&BlogCategory::AiAutomation)
    }
}

impl std::fmt::Display for BlogCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

impl std::str::FromStr for BlogCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.display_name() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown blog category: {}", s))
    }
}
