use crate::ChatId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of chat a message was posted in.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatKind {
    Private,
    Group,
    Supergroup,
    Channel,
    #[default]
    Unknown,
}

impl ChatKind {
    /// Parse the platform's chat type string ("private", "group", ...).
    pub fn from_platform(kind: &str) -> Self {
        match kind {
            "private" => Self::Private,
            "group" => Self::Group,
            "supergroup" => Self::Supergroup,
            "channel" => Self::Channel,
            _ => Self::Unknown,
        }
    }

    /// Whether this is a one-to-one chat with the bot.
    pub fn is_private(&self) -> bool {
        matches!(self, Self::Private)
    }
}

/// An incoming message from a channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingMessage {
    pub id: Uuid,
    /// Channel name (e.g. "telegram").
    pub channel: String,
    pub chat_id: ChatId,
    pub chat_kind: ChatKind,
    /// Platform message id, monotonically increasing within a chat.
    pub message_id: i64,
    /// Platform-specific user ID. Absent for channel posts.
    pub sender_id: Option<String>,
    /// Human-readable sender name.
    pub sender_name: Option<String>,
    /// Message text (or media caption). `None` for text-less messages.
    pub text: Option<String>,
    pub timestamp: DateTime<Utc>,
    /// Whether this arrived as a broadcast channel post.
    #[serde(default)]
    pub is_channel_post: bool,
}

impl IncomingMessage {
    /// Message text, or an empty string when there is none.
    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

/// An outgoing message to send back through a channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub chat_id: ChatId,
    pub text: String,
}

/// Chat metadata as reported by the platform.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatInfo {
    pub id: ChatId,
    pub kind: ChatKind,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Public handle without the leading `@`.
    pub username: Option<String>,
    /// File id of the largest profile photo, if the chat has one.
    pub photo_file_id: Option<String>,
}

/// The bot's own membership in a chat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberInfo {
    /// "creator", "administrator", "member", "restricted", "left" or "kicked".
    pub status: String,
    /// Only reported for channel administrators.
    pub can_post_messages: Option<bool>,
}

impl MemberInfo {
    /// Whether the bot may post in the chat: admins and creators can, and in
    /// channels an administrator additionally needs `can_post_messages`.
    pub fn can_post(&self, kind: ChatKind) -> bool {
        match self.status.as_str() {
            "creator" => true,
            "administrator" => {
                kind != ChatKind::Channel || self.can_post_messages.unwrap_or(false)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_kind_from_platform() {
        assert_eq!(ChatKind::from_platform("private"), ChatKind::Private);
        assert_eq!(ChatKind::from_platform("supergroup"), ChatKind::Supergroup);
        assert_eq!(ChatKind::from_platform("channel"), ChatKind::Channel);
        assert_eq!(ChatKind::from_platform(""), ChatKind::Unknown);
        assert!(ChatKind::Private.is_private());
        assert!(!ChatKind::Group.is_private());
    }

    #[test]
    fn test_member_can_post() {
        let admin = MemberInfo {
            status: "administrator".into(),
            can_post_messages: None,
        };
        assert!(admin.can_post(ChatKind::Supergroup));
        assert!(!admin.can_post(ChatKind::Channel));

        let channel_admin = MemberInfo {
            status: "administrator".into(),
            can_post_messages: Some(true),
        };
        assert!(channel_admin.can_post(ChatKind::Channel));

        let member = MemberInfo {
            status: "member".into(),
            can_post_messages: None,
        };
        assert!(!member.can_post(ChatKind::Group));

        let creator = MemberInfo {
            status: "creator".into(),
            can_post_messages: None,
        };
        assert!(creator.can_post(ChatKind::Channel));
    }
}
