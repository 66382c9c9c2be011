//! Bounded per-chat memory of recently seen messages.

use linkwatch_core::{message::IncomingMessage, ChatId};
use std::collections::{HashMap, VecDeque};

/// Chats remembered at once; the oldest chat is forgotten first.
const MAX_CHATS: usize = 256;

pub(crate) struct Backlog {
    per_chat: usize,
    chats: HashMap<ChatId, VecDeque<IncomingMessage>>,
    /// Chat ids in first-seen order, for eviction.
    order: VecDeque<ChatId>,
}

impl Backlog {
    pub(crate) fn new(per_chat: usize) -> Self {
        Self {
            per_chat,
            chats: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    /// Remember a message. Text-less messages are skipped; commands are
    /// kept and left to the consumer to recognize.
    pub(crate) fn push(&mut self, msg: &IncomingMessage) {
        if self.per_chat == 0 {
            return;
        }
        let text = msg.text_or_empty();
        if text.is_empty() {
            return;
        }

        if !self.chats.contains_key(&msg.chat_id) {
            if self.chats.len() >= MAX_CHATS {
                if let Some(oldest) = self.order.pop_front() {
                    self.chats.remove(&oldest);
                }
            }
            self.order.push_back(msg.chat_id);
        }

        let queue = self.chats.entry(msg.chat_id).or_default();
        queue.push_back(msg.clone());
        while queue.len() > self.per_chat {
            queue.pop_front();
        }
    }

    /// Messages of `chat` with an id below `before_message_id`, oldest first.
    pub(crate) fn before(&self, chat: ChatId, before_message_id: i64) -> Vec<IncomingMessage> {
        self.chats
            .get(&chat)
            .map(|queue| {
                queue
                    .iter()
                    .filter(|m| m.message_id < before_message_id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use linkwatch_core::message::ChatKind;
    use uuid::Uuid;

    fn msg(chat_id: ChatId, message_id: i64, text: &str) -> IncomingMessage {
        IncomingMessage {
            id: Uuid::new_v4(),
            channel: "telegram".into(),
            chat_id,
            chat_kind: ChatKind::Supergroup,
            message_id,
            sender_id: Some("1".into()),
            sender_name: None,
            text: Some(text.into()),
            timestamp: Utc::now(),
            is_channel_post: false,
        }
    }

    #[test]
    fn test_keeps_last_n_per_chat() {
        let mut backlog = Backlog::new(2);
        for id in 1..=4 {
            backlog.push(&msg(10, id, &format!("m{id}")));
        }
        let kept: Vec<i64> = backlog.before(10, i64::MAX).iter().map(|m| m.message_id).collect();
        assert_eq!(kept, vec![3, 4]);
    }

    #[test]
    fn test_before_filters_by_message_id() {
        let mut backlog = Backlog::new(10);
        backlog.push(&msg(10, 5, "a"));
        backlog.push(&msg(10, 6, "b"));
        backlog.push(&msg(10, 8, "c"));
        let ids: Vec<i64> = backlog.before(10, 7).iter().map(|m| m.message_id).collect();
        assert_eq!(ids, vec![5, 6]);
        assert!(backlog.before(99, 100).is_empty());
    }

    #[test]
    fn test_empty_skipped() {
        let mut backlog = Backlog::new(10);
        backlog.push(&msg(10, 2, ""));
        let mut no_text = msg(10, 3, "");
        no_text.text = None;
        backlog.push(&no_text);
        assert!(backlog.before(10, i64::MAX).is_empty());
    }

    #[test]
    fn test_slash_texts_kept() {
        let mut backlog = Backlog::new(10);
        backlog.push(&msg(10, 1, "/price https://x.com/a"));
        backlog.push(&msg(10, 2, "/connect"));
        assert_eq!(backlog.before(10, i64::MAX).len(), 2);
    }

    #[test]
    fn test_disabled_when_zero() {
        let mut backlog = Backlog::new(0);
        backlog.push(&msg(10, 1, "hello"));
        assert!(backlog.before(10, i64::MAX).is_empty());
    }

    #[test]
    fn test_oldest_chat_evicted() {
        let mut backlog = Backlog::new(1);
        for chat in 0..(MAX_CHATS as i64 + 1) {
            backlog.push(&msg(chat, 1, "hi"));
        }
        assert!(backlog.before(0, i64::MAX).is_empty());
        assert_eq!(backlog.before(MAX_CHATS as i64, i64::MAX).len(), 1);
        assert_eq!(backlog.chats.len(), MAX_CHATS);
    }
}
