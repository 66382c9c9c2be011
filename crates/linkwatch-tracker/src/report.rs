//! `/status` snapshot of a chat's ledger.

use linkwatch_core::config::TrackerConfig;
use linkwatch_core::ChatId;
use std::fmt;

use crate::classify::LinkCategory;
use crate::ledger::ChannelLedger;
use crate::registry::Registry;

/// Read-only summary of one ledger, ready to render as a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub title: Option<String>,
    pub message_count: u64,
    pub update_count: usize,
    pub total_links: usize,
    /// One URL per non-empty category, in category order.
    pub representatives: Vec<(LinkCategory, String)>,
    /// Most recent updates, oldest first, already shortened.
    pub recent_updates: Vec<String>,
}

/// Report for `chat`, or `None` when it was never connected.
pub fn status(registry: &Registry, chat: ChatId, config: &TrackerConfig) -> Option<StatusReport> {
    registry
        .get(chat)
        .map(|ledger| StatusReport::from_ledger(ledger, config))
}

impl StatusReport {
    pub fn from_ledger(ledger: &ChannelLedger, config: &TrackerConfig) -> Self {
        let representatives = ledger
            .links
            .iter()
            .filter_map(|(category, urls)| urls.first().map(|url| (*category, url.clone())))
            .collect();

        let recent_updates = ledger
            .recent_updates(config.recent_updates)
            .iter()
            .map(|u| preview(&u.text, config.update_preview_chars))
            .collect();

        Self {
            title: ledger.metadata.title.clone(),
            message_count: ledger.message_count,
            update_count: ledger.updates.len(),
            total_links: ledger.distinct_links(),
            representatives,
            recent_updates,
        }
    }
}

/// First `max_chars` characters of `text` followed by `...`.
fn preview(text: &str, max_chars: usize) -> String {
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.title {
            Some(title) => writeln!(f, "Status for {title}")?,
            None => writeln!(f, "Status")?,
        }
        writeln!(f, "Messages tracked: {}", self.message_count)?;
        writeln!(f, "Updates: {}", self.update_count)?;
        write!(f, "Links: {}", self.total_links)?;

        if !self.representatives.is_empty() {
            writeln!(f)?;
            for (category, url) in &self.representatives {
                write!(f, "\n{}: {url}", category.label())?;
            }
        }

        if !self.recent_updates.is_empty() {
            write!(f, "\n\nRecent updates:")?;
            for update in &self.recent_updates {
                write!(f, "\n- {update}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::ChannelMetadata;
    use chrono::Utc;

    fn cfg() -> TrackerConfig {
        TrackerConfig::default()
    }

    #[test]
    fn test_never_connected_has_no_report() {
        let registry = Registry::new();
        assert!(status(&registry, 404, &cfg()).is_none());
        assert!(!registry.is_registered(404));
    }

    #[test]
    fn test_report_counts_and_representatives() {
        let mut registry = Registry::new();
        registry.register(100, ChannelMetadata::default());
        registry.record_message(
            100,
            "Check our chart at https://dexscreener.com/abc and join https://t.me/projectchat",
            Utc::now(),
        );
        registry.record_message(100, "also https://t.me/aaa", Utc::now());

        let report = status(&registry, 100, &cfg()).unwrap();
        assert_eq!(report.message_count, 2);
        assert_eq!(report.update_count, 0);
        assert_eq!(report.total_links, 3);
        assert_eq!(
            report.representatives,
            vec![
                (LinkCategory::Telegram, "https://t.me/aaa".to_string()),
                (LinkCategory::Chart, "https://dexscreener.com/abc".to_string()),
            ]
        );
    }

    #[test]
    fn test_recent_updates_truncated() {
        let mut registry = Registry::new();
        registry.register(1, ChannelMetadata::default());
        let long = format!("Huge announcement coming! {}", "x".repeat(200));
        registry.record_message(1, "release one", Utc::now());
        registry.record_message(1, "release two", Utc::now());
        registry.record_message(1, "release three", Utc::now());
        registry.record_message(1, &long, Utc::now());

        let report = status(&registry, 1, &cfg()).unwrap();
        assert_eq!(report.update_count, 4);
        assert_eq!(report.recent_updates.len(), 3);
        assert_eq!(report.recent_updates[0], "release two...");
        let last = &report.recent_updates[2];
        assert!(last.starts_with("Huge announcement coming!"));
        assert_eq!(last.chars().count(), 103);
        assert!(last.ends_with("..."));
    }

    #[test]
    fn test_preview_counts_chars_not_bytes() {
        assert_eq!(preview("🚀🚀🚀", 2), "🚀🚀...");
        assert_eq!(preview("", 100), "...");
    }

    #[test]
    fn test_display_renders_sections() {
        let mut registry = Registry::new();
        registry.register(
            1,
            ChannelMetadata {
                title: Some("Alpha".into()),
                ..Default::default()
            },
        );
        registry.record_message(1, "Launch! https://x.com/alpha", Utc::now());

        let text = status(&registry, 1, &cfg()).unwrap().to_string();
        assert!(text.starts_with("Status for Alpha\n"));
        assert!(text.contains("Messages tracked: 1"));
        assert!(text.contains("Updates: 1"));
        assert!(text.contains("Twitter/X: https://x.com/alpha"));
        assert!(text.contains("Recent updates:\n- Launch! https://x.com/alpha..."));
    }

    #[test]
    fn test_display_empty_ledger() {
        let mut registry = Registry::new();
        registry.register(2, ChannelMetadata::default());
        let text = status(&registry, 2, &cfg()).unwrap().to_string();
        assert_eq!(text, "Status\nMessages tracked: 0\nUpdates: 0\nLinks: 0");
    }
}
