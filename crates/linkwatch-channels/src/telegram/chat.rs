//! Chat metadata lookups: `getChat`, `getFile`, `getMe`, `getChatMember`.

use super::types::{TgChatFull, TgChatMember, TgFile, TgResponse, TgUser};
use super::TelegramChannel;
use linkwatch_core::{
    error::LinkwatchError,
    message::{ChatInfo, ChatKind, MemberInfo},
    ChatId,
};
use serde::de::DeserializeOwned;
use tracing::debug;

impl TelegramChannel {
    /// Call a Bot API method with JSON params and unwrap its `result`.
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<T, LinkwatchError> {
        let url = format!("{}/{method}", self.base_url);
        let resp: TgResponse<T> = self
            .client
            .post(&url)
            .json(&params)
            .send()
            .await
            .map_err(|e| LinkwatchError::Channel(format!("telegram {method} failed: {e}")))?
            .json()
            .await
            .map_err(|e| LinkwatchError::Channel(format!("telegram {method} parse failed: {e}")))?;
        into_result(method, resp)
    }

    /// `getChat`. The pinned text is kept for the `get_pinned` that follows.
    pub(crate) async fn get_chat(&self, chat_id: ChatId) -> Result<ChatInfo, LinkwatchError> {
        let chat: TgChatFull = self
            .call("getChat", serde_json::json!({ "chat_id": chat_id }))
            .await?;
        let (info, pinned) = split_pinned(chat);
        self.pinned_cache.lock().await.insert(chat_id, pinned);
        Ok(info)
    }

    /// Text (or caption) of the pinned message. `None` when nothing is pinned.
    ///
    /// Served from the preceding `get_chat` when there was one.
    pub(crate) async fn get_pinned(
        &self,
        chat_id: ChatId,
    ) -> Result<Option<String>, LinkwatchError> {
        if let Some(pinned) = self.pinned_cache.lock().await.remove(&chat_id) {
            return Ok(pinned);
        }
        let chat: TgChatFull = self
            .call("getChat", serde_json::json!({ "chat_id": chat_id }))
            .await?;
        Ok(split_pinned(chat).1)
    }

    /// Storage path of a file. `None` when Telegram has no path for it.
    pub(crate) async fn get_file_path(
        &self,
        file_id: &str,
    ) -> Result<Option<String>, LinkwatchError> {
        let file: TgFile = self
            .call("getFile", serde_json::json!({ "file_id": file_id }))
            .await?;
        Ok(file.file_path)
    }

    /// The bot's own id and username, cached after the first `getMe`.
    pub(crate) async fn me(&self) -> Result<BotIdentity, LinkwatchError> {
        let mut cached = self.me.lock().await;
        if let Some(me) = cached.as_ref() {
            return Ok(me.clone());
        }
        let user: TgUser = self.call("getMe", serde_json::json!({})).await?;
        debug!("telegram: bot is {} ({:?})", user.id, user.username);
        let me = BotIdentity {
            id: user.id,
            username: user.username,
        };
        *cached = Some(me.clone());
        Ok(me)
    }

    pub(crate) async fn get_bot_member(
        &self,
        chat_id: ChatId,
    ) -> Result<MemberInfo, LinkwatchError> {
        let user_id = self.me().await?.id;
        let member: TgChatMember = self
            .call(
                "getChatMember",
                serde_json::json!({ "chat_id": chat_id, "user_id": user_id }),
            )
            .await?;
        Ok(member_info(member))
    }
}

#[derive(Debug, Clone)]
pub(crate) struct BotIdentity {
    pub id: i64,
    pub username: Option<String>,
}

/// Turn a Bot API envelope into its result or a channel error.
pub(crate) fn into_result<T>(method: &str, resp: TgResponse<T>) -> Result<T, LinkwatchError> {
    if !resp.ok {
        return Err(LinkwatchError::Channel(format!(
            "telegram {method} error {}: {}",
            resp.error_code.unwrap_or_default(),
            resp.description.unwrap_or_default()
        )));
    }
    resp.result
        .ok_or_else(|| LinkwatchError::Channel(format!("telegram {method} returned no result")))
}

/// Flatten a `getChat` result into chat info and the pinned text.
///
/// An empty description or pinned text counts as absent.
pub(crate) fn split_pinned(mut chat: TgChatFull) -> (ChatInfo, Option<String>) {
    let pinned = chat
        .pinned_message
        .take()
        .map(|m| *m)
        .and_then(|m| m.text.or(m.caption))
        .filter(|t| !t.is_empty());
    let info = ChatInfo {
        id: chat.id,
        kind: ChatKind::from_platform(&chat.chat_type),
        title: chat.title,
        description: chat.description.filter(|d| !d.is_empty()),
        username: chat.username,
        photo_file_id: chat.photo.map(|p| p.big_file_id),
    };
    (info, pinned)
}

pub(crate) fn member_info(member: TgChatMember) -> MemberInfo {
    MemberInfo {
        status: member.status,
        can_post_messages: member.can_post_messages,
    }
}
