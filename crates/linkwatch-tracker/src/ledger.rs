//! Per-chat accumulated tracking state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::classify::{ClassifiedLink, LinkCategory};

/// A message flagged as an important update. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Update {
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Descriptive snapshot of a chat, captured on connect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Platform file reference (path or id) of the chat photo.
    pub photo_reference: Option<String>,
    pub pinned_message_text: Option<String>,
    pub resolved_website: Option<String>,
    /// Canonical account link per social platform.
    #[serde(default)]
    pub resolved_social_handles: BTreeMap<LinkCategory, String>,
}

impl ChannelMetadata {
    /// Overwrite fields that are present in `partial`; leave the rest alone.
    /// Social handles are merged key by key.
    pub fn merge(&mut self, partial: ChannelMetadata) {
        if partial.title.is_some() {
            self.title = partial.title;
        }
        if partial.description.is_some() {
            self.description = partial.description;
        }
        if partial.photo_reference.is_some() {
            self.photo_reference = partial.photo_reference;
        }
        if partial.pinned_message_text.is_some() {
            self.pinned_message_text = partial.pinned_message_text;
        }
        if partial.resolved_website.is_some() {
            self.resolved_website = partial.resolved_website;
        }
        self.resolved_social_handles
            .extend(partial.resolved_social_handles);
    }
}

/// Everything tracked for one connected chat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelLedger {
    pub message_count: u64,
    pub links: BTreeMap<LinkCategory, BTreeSet<String>>,
    /// Append-only, arrival order.
    pub updates: Vec<Update>,
    pub metadata: ChannelMetadata,
    pub connected_at: DateTime<Utc>,
}

impl ChannelLedger {
    pub fn new(metadata: ChannelMetadata, connected_at: DateTime<Utc>) -> Self {
        Self {
            message_count: 0,
            links: BTreeMap::new(),
            updates: Vec::new(),
            metadata,
            connected_at,
        }
    }

    /// Insert a classified link. Returns `false` if it was already known.
    pub fn insert_link(&mut self, link: ClassifiedLink) -> bool {
        self.links.entry(link.category).or_default().insert(link.url)
    }

    pub fn record_update(&mut self, text: &str, timestamp: DateTime<Utc>) {
        self.updates.push(Update {
            text: text.to_string(),
            timestamp,
        });
    }

    /// Distinct links across all categories.
    pub fn distinct_links(&self) -> usize {
        self.links.values().map(BTreeSet::len).sum()
    }

    /// Links of one category, sorted.
    pub fn links_in(&self, category: LinkCategory) -> impl Iterator<Item = &str> {
        self.links
            .get(&category)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// The `n` most recent updates, oldest of them first.
    pub fn recent_updates(&self, n: usize) -> &[Update] {
        let start = self.updates.len().saturating_sub(n);
        &self.updates[start..]
    }
}
