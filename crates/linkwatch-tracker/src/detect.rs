//! Keyword heuristic for important updates.

/// Lowercase keywords that flag a message as an update.
pub const UPDATE_KEYWORDS: &[&str] = &["launch", "update", "announcement", "release"];

/// Whether `text` reads like an announcement.
///
/// Plain substring containment on the lowercased text, so "relaunched"
/// and "updates" count too.
pub fn is_update(text: &str) -> bool {
    let lower = text.to_lowercase();
    UPDATE_KEYWORDS.iter().any(|kw| lower.contains(kw))
}
