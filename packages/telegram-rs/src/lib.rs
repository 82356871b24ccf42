// Minimal Telegram Bot API client: text messages, photos with captions, chat lookup.

pub mod models;

use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use crate::models::{BotResponse, Chat, GetChatRequest, Message, SendMessageRequest, SendPhotoRequest};

/// Hard limit Telegram enforces on photo captions.
pub const CAPTION_LIMIT: usize = 1024;

const API_BASE: &str = "https://api.telegram.org";

#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("Telegram is not configured: {0}")]
    Config(&'static str),

    #[error("Request to Telegram failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Telegram API error ({status}): {description}")]
    Api { status: u16, description: String },
}

#[derive(Debug, Clone)]
pub struct TelegramOptions {
    pub bot_token: String,
}

#[derive(Debug, Clone)]
pub struct TelegramService {
    options: TelegramOptions,
    client: Client,
    api_base: String,
}

impl TelegramService {
    pub fn new(options: TelegramOptions) -> Self {
        Self {
            options,
            client: Client::new(),
            api_base: API_BASE.to_string(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Send an HTML formatted text message.
    pub async fn send_message(&self, chat_id: &str, text: &str) -> Result<Message, TelegramError> {
        let body = SendMessageRequest {
            chat_id,
            text,
            parse_mode: "HTML",
            disable_web_page_preview: true,
        };
        self.call("sendMessage", chat_id, &body).await
    }

    /// Send a photo by URL with an HTML caption.
    pub async fn send_photo(
        &self,
        chat_id: &str,
        photo_url: &str,
        caption: &str,
    ) -> Result<Message, TelegramError> {
        let body = SendPhotoRequest {
            chat_id,
            photo: photo_url,
            caption,
            parse_mode: "HTML",
        };
        self.call("sendPhoto", chat_id, &body).await
    }

    /// Look up a chat. Fails if the bot has no access to it.
    pub async fn get_chat(&self, chat_id: &str) -> Result<Chat, TelegramError> {
        self.call("getChat", chat_id, &GetChatRequest { chat_id }).await
    }

    async fn call<B, T>(&self, method: &str, chat_id: &str, body: &B) -> Result<T, TelegramError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        if self.options.bot_token.is_empty() {
            return Err(TelegramError::Config("bot token is empty"));
        }
        if chat_id.is_empty() {
            return Err(TelegramError::Config("chat id is empty"));
        }

        let url = format!("{}/bot{}/{}", self.api_base, self.options.bot_token, method);
        let response = self.client.post(url).json(body).send().await?;
        let status = response.status();

        // Telegram answers errors with a JSON envelope too; fall back to the
        // raw body if it isn't one.
        let text = response.text().await?;
        let parsed: Option<BotResponse<T>> = serde_json::from_str(&text).ok();

        match parsed {
            Some(BotResponse {
                ok: true,
                result: Some(result),
                ..
            }) if status.is_success() => {
                tracing::debug!(method, chat_id, "Telegram call succeeded");
                Ok(result)
            }
            Some(envelope) => {
                let description = envelope
                    .description
                    .unwrap_or_else(|| "Unknown error".to_string());
                tracing::warn!(method, chat_id, status = %status, %description, "Telegram API error");
                Err(TelegramError::Api {
                    status: status.as_u16(),
                    description,
                })
            }
            None => {
                tracing::warn!(method, chat_id, status = %status, body = %text, "Unexpected Telegram response");
                Err(TelegramError::Api {
                    status: status.as_u16(),
                    description: text,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_photo_body_uses_html_parse_mode() {
        let body = SendPhotoRequest {
            chat_id: "-100123",
            photo: "https://img/x.jpg",
            caption: "<b>Hi</b>",
            parse_mode: "HTML",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["chat_id"], "-100123");
        assert_eq!(json["photo"], "https://img/x.jpg");
        assert_eq!(json["parse_mode"], "HTML");
    }

    #[test]
    fn error_envelope_parses() {
        let raw = r#"{"ok":false,"error_code":400,"description":"Bad Request: chat not found"}"#;
        let parsed: BotResponse<Message> = serde_json::from_str(raw).unwrap();
        assert!(!parsed.ok);
        assert!(parsed.result.is_none());
        assert_eq!(parsed.description.as_deref(), Some("Bad Request: chat not found"));
    }

    #[tokio::test]
    async fn empty_token_is_rejected_before_any_request() {
        let service = TelegramService::new(TelegramOptions {
            bot_token: String::new(),
        });
        let err = service.send_message("-100123", "hello").await.unwrap_err();
        assert!(matches!(err, TelegramError::Config(_)));
    }

    #[tokio::test]
    async fn empty_chat_is_rejected_before_any_request() {
        let service = TelegramService::new(TelegramOptions {
            bot_token: "123:abc".to_string(),
        });
        let err = service.get_chat("").await.unwrap_err();
        assert!(matches!(err, TelegramError::Config(_)));
    }
}
