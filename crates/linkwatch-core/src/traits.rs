use crate::{
    error::LinkwatchError,
    message::{ChatInfo, IncomingMessage, MemberInfo, OutgoingMessage},
    ChatId,
};
use async_trait::async_trait;

/// Messaging Channel trait.
///
/// Every messaging platform implements this trait to stream incoming
/// messages, send replies, and answer the metadata lookups `/connect` needs.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Human-readable channel name.
    fn name(&self) -> &str;

    /// Start listening for incoming messages.
    ///
    /// The returned receiver closes when the stream ends; the gateway's
    /// supervisor decides whether to call `start` again.
    async fn start(&self) -> Result<tokio::sync::mpsc::Receiver<IncomingMessage>, LinkwatchError>;

    /// Why the most recent stream from `start` ended, if it ended on an error.
    /// Taking it clears it.
    async fn take_stream_error(&self) -> Option<LinkwatchError> {
        None
    }

    /// The bot's own handle on this platform, for matching `/cmd@handle`.
    /// `None` when the platform has none or it cannot be determined.
    async fn bot_username(&self) -> Option<String> {
        None
    }

    /// Send a text message to a chat.
    async fn send(&self, message: OutgoingMessage) -> Result<(), LinkwatchError>;

    /// Fetch chat metadata (title, description, handle, photo).
    async fn fetch_chat(&self, chat_id: ChatId) -> Result<ChatInfo, LinkwatchError>;

    /// Resolve a file id to its storage path. `None` when the platform has no path.
    async fn fetch_file_path(&self, _file_id: &str) -> Result<Option<String>, LinkwatchError> {
        Ok(None)
    }

    /// Text of the chat's pinned message. `None` when nothing is pinned.
    async fn fetch_pinned(&self, _chat_id: ChatId) -> Result<Option<String>, LinkwatchError> {
        Ok(None)
    }

    /// The bot's own membership in a chat, for posting-permission checks.
    async fn fetch_bot_member(
        &self,
        _chat_id: ChatId,
    ) -> Result<Option<MemberInfo>, LinkwatchError> {
        Ok(None)
    }

    /// Recently observed messages for a chat with a message id below
    /// `before_message_id`, oldest first. Best-effort; usually empty.
    async fn recent_messages(
        &self,
        _chat_id: ChatId,
        _before_message_id: i64,
    ) -> Vec<IncomingMessage> {
        Vec::new()
    }

    /// Graceful shutdown.
    async fn stop(&self) -> Result<(), LinkwatchError>;
}
