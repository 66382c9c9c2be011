//! Stream entry point for inbound messages.

use chrono::{DateTime, Utc};
use linkwatch_core::ChatId;
use tracing::debug;

use crate::registry::{Ingested, Registry};

/// Feed one inbound message into the registry.
///
/// Text-less messages (media without caption, service messages) are
/// ignored. Unregistered chats are ignored too.
pub fn on_message(
    registry: &mut Registry,
    chat: ChatId,
    text: Option<&str>,
    timestamp: DateTime<Utc>,
) -> Option<Ingested> {
    let text = text.filter(|t| !t.is_empty())?;
    let ingested = registry.record_message(chat, text, timestamp);
    if ingested.is_none() {
        debug!("pipeline: chat {chat} is not connected, ignoring message");
    }
    ingested
}
