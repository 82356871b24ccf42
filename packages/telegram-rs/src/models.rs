use serde::{Deserialize, Serialize};

/// Envelope every Bot API method returns.
#[derive(Debug, Deserialize)]
pub struct BotResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SendMessageRequest<'a> {
    pub chat_id: &'a str,
    pub text: &'a str,
    pub parse_mode: &'a str,
    pub disable_web_page_preview: bool,
}

#[derive(Debug, Serialize)]
pub struct SendPhotoRequest<'a> {
    pub chat_id: &'a str,
    pub photo: &'a str,
    pub caption: &'a str,
    pub parse_mode: &'a str,
}

#[derive(Debug, Serialize)]
pub struct GetChatRequest<'a> {
    pub chat_id: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub date: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type")]
    pub chat_type: String,
    pub title: Option<String>,
    pub username: Option<String>,
}
