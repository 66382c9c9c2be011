//! In-memory channel for gateway and command tests.

use async_trait::async_trait;
use chrono::Utc;
use linkwatch_core::{
    error::LinkwatchError,
    message::{ChatInfo, ChatKind, IncomingMessage, MemberInfo, OutgoingMessage},
    traits::Channel,
    ChatId,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use uuid::Uuid;

/// A mock channel that serves canned metadata and records sent messages.
#[derive(Default)]
pub struct MockChannel {
    pub sent: Arc<Mutex<Vec<OutgoingMessage>>>,
    /// `None` makes `fetch_chat` fail.
    pub chat: Option<ChatInfo>,
    pub pinned: Option<String>,
    pub file_path: Option<String>,
    pub member: Option<MemberInfo>,
    pub member_fails: bool,
    pub backlog: Vec<IncomingMessage>,
    /// Artificial latency on `fetch_chat`.
    pub fetch_delay: Duration,
    pub username: Option<String>,
    /// Handed out by successive `start` calls, front first.
    pub streams: Mutex<VecDeque<mpsc::Receiver<IncomingMessage>>>,
}

impl MockChannel {
    pub fn with_chat(chat: ChatInfo) -> Self {
        Self {
            chat: Some(chat),
            ..Default::default()
        }
    }

    pub fn sent_texts(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|m| m.text.clone())
            .collect()
    }
}

#[async_trait]
impl Channel for MockChannel {
    fn name(&self) -> &str {
        "mock"
    }

    async fn start(&self) -> Result<mpsc::Receiver<IncomingMessage>, LinkwatchError> {
        match self.streams.lock().unwrap().pop_front() {
            Some(rx) => Ok(rx),
            None => Err(LinkwatchError::Channel("no mock stream left".into())),
        }
    }

    async fn bot_username(&self) -> Option<String> {
        self.username.clone()
    }

    async fn send(&self, message: OutgoingMessage) -> Result<(), LinkwatchError> {
        self.sent.lock().unwrap().push(message);
        Ok(())
    }

    async fn fetch_chat(&self, chat_id: ChatId) -> Result<ChatInfo, LinkwatchError> {
        if !self.fetch_delay.is_zero() {
            tokio::time::sleep(self.fetch_delay).await;
        }
        self.chat
            .clone()
            .map(|c| ChatInfo { id: chat_id, ..c })
            .ok_or_else(|| LinkwatchError::Channel("chat not found".into()))
    }

    async fn fetch_file_path(&self, _file_id: &str) -> Result<Option<String>, LinkwatchError> {
        Ok(self.file_path.clone())
    }

    async fn fetch_pinned(&self, _chat_id: ChatId) -> Result<Option<String>, LinkwatchError> {
        Ok(self.pinned.clone())
    }

    async fn fetch_bot_member(
        &self,
        _chat_id: ChatId,
    ) -> Result<Option<MemberInfo>, LinkwatchError> {
        if self.member_fails {
            return Err(LinkwatchError::Channel("member lookup failed".into()));
        }
        Ok(self.member.clone())
    }

    async fn recent_messages(
        &self,
        chat_id: ChatId,
        before_message_id: i64,
    ) -> Vec<IncomingMessage> {
        self.backlog
            .iter()
            .filter(|m| m.chat_id == chat_id && m.message_id < before_message_id)
            .cloned()
            .collect()
    }

    async fn stop(&self) -> Result<(), LinkwatchError> {
        Ok(())
    }
}

/// A text message on the mock channel.
pub fn message(chat_id: ChatId, message_id: i64, kind: ChatKind, text: &str) -> IncomingMessage {
    IncomingMessage {
        id: Uuid::new_v4(),
        channel: "mock".to_string(),
        chat_id,
        chat_kind: kind,
        message_id,
        sender_id: Some("7".to_string()),
        sender_name: Some("tester".to_string()),
        text: Some(text.to_string()),
        timestamp: Utc::now(),
        is_channel_post: kind == ChatKind::Channel,
    }
}
