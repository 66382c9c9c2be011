//! URL extraction from free-form message text.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("URL pattern is valid"));

/// Byte ranges of every URL-looking substring in `text`, left to right.
///
/// A match starts at `http://` or `https://` and runs to the next whitespace.
/// A single trailing `)` is left out so links inside parentheses come out clean.
pub fn url_spans(text: &str) -> Vec<Range<usize>> {
    URL_RE
        .find_iter(text)
        .map(|m| {
            let end = if m.as_str().ends_with(')') {
                m.end() - 1
            } else {
                m.end()
            };
            m.start()..end
        })
        .collect()
}

/// URL substrings of `text` in order of occurrence.
pub fn extract_urls(text: &str) -> Vec<&str> {
    url_spans(text).into_iter().map(|r| &text[r]).collect()
}
