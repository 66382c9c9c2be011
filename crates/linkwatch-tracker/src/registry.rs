//! Chat id → ledger map.
//!
//! A chat has a ledger only after an explicit [`Registry::register`]. Every
//! mutating call on an unknown chat is a no-op.

use chrono::{DateTime, Utc};
use linkwatch_core::ChatId;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::debug;

use crate::classify::{classify_with_context, ClassifiedLink};
use crate::detect::is_update;
use crate::extract::extract_urls;
use crate::ledger::{ChannelLedger, ChannelMetadata};

/// What one message contributed to a ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ingested {
    /// URLs found in the text, before dedup.
    pub urls_seen: usize,
    /// Links that were not in the ledger yet.
    pub new_links: Vec<ClassifiedLink>,
    pub is_update: bool,
}

/// All monitored chats.
#[derive(Debug, Default)]
pub struct Registry {
    ledgers: HashMap<ChatId, ChannelLedger>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or replace the ledger for `chat`, with zeroed counters.
    pub fn register(&mut self, chat: ChatId, metadata: ChannelMetadata) -> &mut ChannelLedger {
        self.register_at(chat, metadata, Utc::now())
    }

    pub fn register_at(
        &mut self,
        chat: ChatId,
        metadata: ChannelMetadata,
        connected_at: DateTime<Utc>,
    ) -> &mut ChannelLedger {
        let ledger = ChannelLedger::new(metadata, connected_at);
        match self.ledgers.entry(chat) {
            Entry::Occupied(mut slot) => {
                debug!("registry: replaced ledger for chat {chat}");
                slot.insert(ledger);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(ledger),
        }
    }

    pub fn get(&self, chat: ChatId) -> Option<&ChannelLedger> {
        self.ledgers.get(&chat)
    }

    pub fn is_registered(&self, chat: ChatId) -> bool {
        self.ledgers.contains_key(&chat)
    }

    pub fn len(&self) -> usize {
        self.ledgers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ledgers.is_empty()
    }

    /// Registered chat ids, unordered.
    pub fn chats(&self) -> impl Iterator<Item = ChatId> + '_ {
        self.ledgers.keys().copied()
    }

    /// Ingest one message into `chat`'s ledger.
    ///
    /// Returns `None` when the chat is not registered.
    pub fn record_message(
        &mut self,
        chat: ChatId,
        text: &str,
        timestamp: DateTime<Utc>,
    ) -> Option<Ingested> {
        let ledger = self.ledgers.get_mut(&chat)?;
        ledger.message_count += 1;

        let mut ingested = Ingested::default();
        for raw in extract_urls(text) {
            ingested.urls_seen += 1;
            let link = classify_with_context(raw, text);
            if ledger.insert_link(link.clone()) {
                ingested.new_links.push(link);
            }
        }

        if is_update(text) {
            ledger.record_update(text, timestamp);
            ingested.is_update = true;
        }

        Some(ingested)
    }

    /// Merge the present fields of `partial` into `chat`'s metadata.
    /// Returns `false` when the chat is not registered.
    pub fn populate_metadata(&mut self, chat: ChatId, partial: ChannelMetadata) -> bool {
        match self.ledgers.get_mut(&chat) {
            Some(ledger) => {
                ledger.metadata.merge(partial);
                true
            }
            None => false,
        }
    }
}
