//! Telegram Bot API deserialization types.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct TgResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    /// HTTP-like code on failures, e.g. 409 when another poller is active.
    pub error_code: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TgUpdate {
    pub update_id: i64,
    pub message: Option<TgMessage>,
    pub channel_post: Option<TgMessage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TgMessage {
    pub message_id: i64,
    pub from: Option<TgUser>,
    pub chat: TgChat,
    /// Unix seconds.
    #[serde(default)]
    pub date: i64,
    pub text: Option<String>,
    pub caption: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TgUser {
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TgChat {
    pub id: i64,
    /// Chat type: "private", "group", "supergroup", or "channel".
    #[serde(default, rename = "type")]
    pub chat_type: String,
    pub title: Option<String>,
}

/// Result of `getChat`.
#[derive(Debug, Deserialize)]
pub(crate) struct TgChatFull {
    pub id: i64,
    #[serde(default, rename = "type")]
    pub chat_type: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub username: Option<String>,
    pub photo: Option<TgChatPhoto>,
    pub pinned_message: Option<Box<TgMessage>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TgChatPhoto {
    pub big_file_id: String,
}

/// Result of `getChatMember`.
#[derive(Debug, Deserialize)]
pub(crate) struct TgChatMember {
    pub status: String,
    pub can_post_messages: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TgFile {
    pub file_path: Option<String>,
}
