//! Long-polling update loop and Channel trait implementation.

use super::types::{TgMessage, TgResponse, TgUpdate};
use super::TelegramChannel;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use linkwatch_core::{
    error::LinkwatchError,
    message::{ChatInfo, ChatKind, IncomingMessage, MemberInfo, OutgoingMessage},
    traits::Channel,
    ChatId,
};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

#[async_trait]
impl Channel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn start(&self) -> Result<mpsc::Receiver<IncomingMessage>, LinkwatchError> {
        self.register_commands().await;
        self.stream_error.lock().await.take();

        let (tx, rx) = mpsc::channel(64);
        let client = self.client.clone();
        let base_url = self.base_url.clone();
        let allowed_chats = self.config.allowed_chats.clone();
        let poll_timeout = self.config.poll_timeout_secs;
        let last_update_id = self.last_update_id.clone();
        let backlog = self.backlog.clone();
        let stream_error = self.stream_error.clone();

        info!("Telegram channel starting long polling...");

        tokio::spawn(async move {
            let mut backoff_secs: u64 = 1;

            loop {
                let last = last_update_id.lock().await;
                let offset = last.map(|id| id + 1);
                drop(last);

                let mut url = format!("{base_url}/getUpdates?timeout={poll_timeout}");
                if let Some(off) = offset {
                    url.push_str(&format!("&offset={off}"));
                }

                let resp = match client
                    .get(&url)
                    .timeout(Duration::from_secs(poll_timeout + 5))
                    .send()
                    .await
                {
                    Ok(r) => r,
                    Err(e) => {
                        error!("telegram poll error (retry in {backoff_secs}s): {e}");
                        tokio::time::sleep(Duration::from_secs(backoff_secs)).await;
                        backoff_secs = (backoff_secs * 2).min(60);
                        continue;
                    }
                };

                let body: TgResponse<Vec<TgUpdate>> = match resp.json().await {
                    Ok(b) => b,
                    Err(e) => {
                        error!("telegram parse error (retry in {backoff_secs}s): {e}");
                        tokio::time::sleep(Duration::from_secs(backoff_secs)).await;
                        backoff_secs = (backoff_secs * 2).min(60);
                        continue;
                    }
                };

                if !body.ok {
                    let description = body.description.unwrap_or_default();
                    if is_conflict(body.error_code) {
                        error!("telegram polling conflict, ending stream: {description}");
                        *stream_error.lock().await = Some(LinkwatchError::Conflict(description));
                        return;
                    }
                    error!("telegram API error (retry in {backoff_secs}s): {description}");
                    tokio::time::sleep(Duration::from_secs(backoff_secs)).await;
                    backoff_secs = (backoff_secs * 2).min(60);
                    continue;
                }

                // Successful poll -- reset backoff.
                backoff_secs = 1;

                let updates = body.result.unwrap_or_default();

                if let Some(last_update) = updates.last() {
                    *last_update_id.lock().await = Some(last_update.update_id);
                }

                for update in updates {
                    let (msg, is_channel_post) = match (update.message, update.channel_post) {
                        (Some(m), _) => (m, false),
                        (None, Some(p)) => (p, true),
                        (None, None) => continue,
                    };

                    if !allowed_chats.is_empty() && !allowed_chats.contains(&msg.chat.id) {
                        warn!("ignoring message from unlisted chat {}", msg.chat.id);
                        continue;
                    }

                    let Some(incoming) = to_incoming(msg, is_channel_post) else {
                        continue;
                    };

                    backlog.lock().await.push(&incoming);

                    if tx.send(incoming).await.is_err() {
                        info!("telegram channel receiver dropped, stopping poll");
                        return;
                    }
                }
            }
        });

        Ok(rx)
    }

    async fn take_stream_error(&self) -> Option<LinkwatchError> {
        self.stream_error.lock().await.take()
    }

    async fn bot_username(&self) -> Option<String> {
        match self.me().await {
            Ok(me) => me.username,
            Err(e) => {
                warn!("telegram: getMe failed, bot username unknown: {e}");
                None
            }
        }
    }

    async fn send(&self, message: OutgoingMessage) -> Result<(), LinkwatchError> {
        self.send_text(message.chat_id, &message.text).await
    }

    async fn fetch_chat(&self, chat_id: ChatId) -> Result<ChatInfo, LinkwatchError> {
        self.get_chat(chat_id).await
    }

    async fn fetch_pinned(&self, chat_id: ChatId) -> Result<Option<String>, LinkwatchError> {
        self.get_pinned(chat_id).await
    }

    async fn fetch_file_path(&self, file_id: &str) -> Result<Option<String>, LinkwatchError> {
        self.get_file_path(file_id).await
    }

    async fn fetch_bot_member(
        &self,
        chat_id: ChatId,
    ) -> Result<Option<MemberInfo>, LinkwatchError> {
        self.get_bot_member(chat_id).await.map(Some)
    }

    async fn recent_messages(
        &self,
        chat_id: ChatId,
        before_message_id: i64,
    ) -> Vec<IncomingMessage> {
        self.backlog.lock().await.before(chat_id, before_message_id)
    }

    async fn stop(&self) -> Result<(), LinkwatchError> {
        info!("Telegram channel stopped");
        Ok(())
    }
}

/// Whether a failed `getUpdates` means another poller owns the token.
pub(crate) fn is_conflict(error_code: Option<i64>) -> bool {
    error_code == Some(409)
}

/// Convert a Bot API message into an [`IncomingMessage`].
///
/// Captions count as text. Messages with neither are dropped.
pub(crate) fn to_incoming(msg: TgMessage, is_channel_post: bool) -> Option<IncomingMessage> {
    let Some(text) = msg.text.or(msg.caption) else {
        debug!("telegram: skipping text-less message in chat {}", msg.chat.id);
        return None;
    };

    let (sender_id, sender_name) = match msg.from {
        Some(user) => {
            let name = if let Some(ref un) = user.username {
                format!("@{un}")
            } else if let Some(ref ln) = user.last_name {
                format!("{} {ln}", user.first_name)
            } else {
                user.first_name.clone()
            };
            (Some(user.id.to_string()), Some(name))
        }
        None => (None, msg.chat.title.clone()),
    };

    let timestamp = Some(msg.date)
        .filter(|d| *d > 0)
        .and_then(|d| DateTime::<Utc>::from_timestamp(d, 0))
        .unwrap_or_else(Utc::now);

    Some(IncomingMessage {
        id: Uuid::new_v4(),
        channel: "telegram".to_string(),
        chat_id: msg.chat.id,
        chat_kind: ChatKind::from_platform(&msg.chat.chat_type),
        message_id: msg.message_id,
        sender_id,
        sender_name,
        text: Some(text),
        timestamp,
        is_channel_post,
    })
}
