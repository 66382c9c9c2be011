//! One-time metadata capture and backfill when a chat is connected.

use chrono::{DateTime, Utc};
use linkwatch_core::ChatId;
use std::fmt;
use tracing::{debug, info};

use crate::classify::{classify_with_context, LinkCategory};
use crate::extract::extract_urls;
use crate::ledger::ChannelMetadata;
use crate::registry::Registry;

/// Chat details gathered from the platform at connect time.
#[derive(Debug, Clone, Default)]
pub struct ChatSnapshot {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Public handle without `@`.
    pub username: Option<String>,
    pub photo_reference: Option<String>,
    pub pinned_text: Option<String>,
}

/// What a connect captured, for the reply and the logs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectSummary {
    pub title: Option<String>,
    pub has_description: bool,
    pub has_photo: bool,
    pub has_pinned: bool,
    pub website: Option<String>,
    pub social_handles: usize,
    /// Backlog messages replayed into the fresh ledger.
    pub backfilled: usize,
    /// Distinct links in the ledger after backfill.
    pub links: usize,
}

/// Register `chat` (replacing any previous ledger), capture its metadata and
/// replay `backlog` through the ingestion path.
pub fn connect(
    registry: &mut Registry,
    chat: ChatId,
    snapshot: ChatSnapshot,
    backlog: Vec<(String, DateTime<Utc>)>,
) -> ConnectSummary {
    registry.register(chat, ChannelMetadata::default());

    let metadata = resolve_metadata(snapshot);
    let mut summary = ConnectSummary {
        title: metadata.title.clone(),
        has_description: metadata.description.is_some(),
        has_photo: metadata.photo_reference.is_some(),
        has_pinned: metadata.pinned_message_text.is_some(),
        website: metadata.resolved_website.clone(),
        social_handles: metadata.resolved_social_handles.len(),
        ..Default::default()
    };
    registry.populate_metadata(chat, metadata);

    for (text, timestamp) in backlog {
        if text.is_empty() {
            continue;
        }
        if registry.record_message(chat, &text, timestamp).is_some() {
            summary.backfilled += 1;
        }
    }
    summary.links = registry.get(chat).map_or(0, |l| l.distinct_links());

    info!(
        "connected chat {chat}: title={:?} backfilled={} links={}",
        summary.title, summary.backfilled, summary.links
    );
    summary
}

/// Build ledger metadata from a platform snapshot.
///
/// The description falls back to the pinned text. Links found in the
/// description and pinned text fill the website and social handles.
fn resolve_metadata(snapshot: ChatSnapshot) -> ChannelMetadata {
    let ChatSnapshot {
        title,
        description,
        username,
        photo_reference,
        pinned_text,
    } = snapshot;

    let mut metadata = ChannelMetadata {
        title,
        description: description.or_else(|| pinned_text.clone()),
        photo_reference,
        pinned_message_text: pinned_text,
        ..Default::default()
    };

    if let Some(username) = username.filter(|u| !u.is_empty()) {
        metadata
            .resolved_social_handles
            .insert(LinkCategory::Telegram, format!("https://t.me/{username}"));
    }

    let sources = [
        metadata.description.clone(),
        metadata.pinned_message_text.clone(),
    ];
    for text in sources.iter().flatten() {
        for raw in extract_urls(text) {
            let link = classify_with_context(raw, text);
            match link.category {
                LinkCategory::Website => {
                    metadata.resolved_website.get_or_insert(link.url);
                }
                category if category.is_social() => {
                    metadata
                        .resolved_social_handles
                        .entry(category)
                        .or_insert(link.url);
                }
                _ => debug!("connect: ignoring {} link in chat info", link.category),
            }
        }
    }

    metadata
}

impl fmt::Display for ConnectSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Connected to {}.",
            self.title.as_deref().unwrap_or("this chat")
        )?;

        let mut captured = Vec::new();
        if self.title.is_some() {
            captured.push("title".to_string());
        }
        if self.has_description {
            captured.push("description".to_string());
        }
        if self.has_photo {
            captured.push("photo".to_string());
        }
        if self.has_pinned {
            captured.push("pinned message".to_string());
        }
        if self.website.is_some() {
            captured.push("website".to_string());
        }
        if self.social_handles > 0 {
            captured.push(format!("{} social handle(s)", self.social_handles));
        }
        if captured.is_empty() {
            writeln!(f, "Captured: nothing yet")?;
        } else {
            writeln!(f, "Captured: {}", captured.join(", "))?;
        }

        write!(
            f,
            "Backfilled {} message(s), {} link(s) tracked.",
            self.backfilled, self.links
        )
    }
}
