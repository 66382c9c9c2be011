//! Link classification: maps a URL to exactly one [`LinkCategory`].
//!
//! Classification walks [`RULES`] in order. A rule matches when its host
//! predicate accepts the URL's host AND its normalizer yields a canonical
//! form; the first match wins. When no rule matches, keyword hints in the
//! surrounding message may still pick `chart`, `swap` or `website`.
//! Everything else is `other`.

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Platform category of a link.
///
/// Declaration order is the display order used in reports.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LinkCategory {
    Twitter,
    Reddit,
    Discord,
    Telegram,
    Facebook,
    Instagram,
    Chart,
    Swap,
    Website,
    Other,
}

impl LinkCategory {
    pub const ALL: [LinkCategory; 10] = [
        Self::Twitter,
        Self::Reddit,
        Self::Discord,
        Self::Telegram,
        Self::Facebook,
        Self::Instagram,
        Self::Chart,
        Self::Swap,
        Self::Website,
        Self::Other,
    ];

    /// Lowercase tag, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Twitter => "twitter",
            Self::Reddit => "reddit",
            Self::Discord => "discord",
            Self::Telegram => "telegram",
            Self::Facebook => "facebook",
            Self::Instagram => "instagram",
            Self::Chart => "chart",
            Self::Swap => "swap",
            Self::Website => "website",
            Self::Other => "other",
        }
    }

    /// Human-readable label for replies.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Twitter => "Twitter/X",
            Self::Reddit => "Reddit",
            Self::Discord => "Discord",
            Self::Telegram => "Telegram",
            Self::Facebook => "Facebook",
            Self::Instagram => "Instagram",
            Self::Chart => "Chart",
            Self::Swap => "Swap",
            Self::Website => "Website",
            Self::Other => "Other",
        }
    }

    /// Social platforms whose canonical link identifies an account.
    pub fn is_social(&self) -> bool {
        matches!(
            self,
            Self::Twitter
                | Self::Reddit
                | Self::Discord
                | Self::Telegram
                | Self::Facebook
                | Self::Instagram
        )
    }
}

impl fmt::Display for LinkCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A URL in canonical form plus its category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedLink {
    pub url: String,
    pub category: LinkCategory,
}

pub const TWITTER_DOMAINS: &[&str] = &["twitter.com", "x.com"];
/// First path segments that name a post rather than an account.
pub const TWITTER_RESERVED: &[&str] = &["status", "posts"];
pub const TELEGRAM_DOMAINS: &[&str] = &["t.me"];
pub const DISCORD_DOMAINS: &[&str] = &["discord.com", "discord.gg"];
pub const REDDIT_DOMAINS: &[&str] = &["reddit.com"];
pub const FACEBOOK_DOMAINS: &[&str] = &["facebook.com"];
pub const INSTAGRAM_DOMAINS: &[&str] = &["instagram.com"];
pub const CHART_DOMAINS: &[&str] = &[
    "dextools.io",
    "dexscreener.com",
    "poocoin.app",
    "defined.fi",
    "solscan.io",
    "birdeye.so",
];
pub const SWAP_DOMAINS: &[&str] = &[
    "pancakeswap.finance",
    "uniswap.org",
    "raydium.io",
    "jupiter.exchange",
];
pub const WEBSITE_TLDS: &[&str] = &[".xyz", ".com", ".io", ".org", ".net"];
/// Host substrings that disqualify a `website` match.
pub const WEBSITE_EXCLUDED: &[&str] = &[
    "twitter",
    "x.com",
    "t.me",
    "discord",
    "dextools",
    "dexscreener",
    "defined.fi",
];

pub const CHART_HINTS: &[&str] = &["chart", "\u{1f4c8}", "\u{1f4ca}"];
pub const SWAP_HINTS: &[&str] = &["swap", "buy", "\u{1f4b1}"];
pub const WEBSITE_HINTS: &[&str] = &["website", "\u{1f310}"];

/// Context hints, consulted in this order when no rule matched.
const HINTS: &[(LinkCategory, &[&str])] = &[
    (LinkCategory::Chart, CHART_HINTS),
    (LinkCategory::Swap, SWAP_HINTS),
    (LinkCategory::Website, WEBSITE_HINTS),
];

/// One entry of the ordered rule table.
pub struct Rule {
    pub category: LinkCategory,
    /// Predicate on the lowercase host.
    pub matches_host: fn(&str) -> bool,
    /// Canonical form, or `None` when the URL's path doesn't fit the category.
    pub normalize: fn(&str, &Url) -> Option<String>,
}

/// Rules in precedence order.
pub const RULES: &[Rule] = &[
    Rule {
        category: LinkCategory::Twitter,
        matches_host: is_twitter_host,
        normalize: normalize_twitter,
    },
    Rule {
        category: LinkCategory::Telegram,
        matches_host: is_telegram_host,
        normalize: normalize_telegram,
    },
    Rule {
        category: LinkCategory::Discord,
        matches_host: is_discord_host,
        normalize: verbatim,
    },
    Rule {
        category: LinkCategory::Reddit,
        matches_host: is_reddit_host,
        normalize: normalize_reddit,
    },
    Rule {
        category: LinkCategory::Facebook,
        matches_host: is_facebook_host,
        normalize: normalize_facebook,
    },
    Rule {
        category: LinkCategory::Instagram,
        matches_host: is_instagram_host,
        normalize: normalize_instagram,
    },
    Rule {
        category: LinkCategory::Chart,
        matches_host: is_chart_host,
        normalize: verbatim,
    },
    Rule {
        category: LinkCategory::Swap,
        matches_host: is_swap_host,
        normalize: verbatim,
    },
    Rule {
        category: LinkCategory::Website,
        matches_host: is_website_host,
        normalize: verbatim,
    },
];

/// Classify a URL on its own.
pub fn classify(raw: &str) -> ClassifiedLink {
    classify_with_context(raw, "")
}

/// Classify a URL found inside `context` (the full message text).
///
/// Never fails: anything unparseable comes back as `other`, verbatim.
pub fn classify_with_context(raw: &str, context: &str) -> ClassifiedLink {
    let other = || ClassifiedLink {
        url: raw.to_string(),
        category: LinkCategory::Other,
    };

    if !(raw.starts_with("http://") || raw.starts_with("https://")) {
        return other();
    }
    let Ok(url) = Url::parse(raw) else {
        return other();
    };
    let Some(host) = url.host_str().map(str::to_lowercase) else {
        return other();
    };

    for rule in RULES {
        if !(rule.matches_host)(&host) {
            continue;
        }
        if let Some(canonical) = (rule.normalize)(raw, &url) {
            return ClassifiedLink {
                url: canonical,
                category: rule.category,
            };
        }
    }

    if let Some(category) = hint_category(context) {
        return ClassifiedLink {
            url: raw.to_string(),
            category,
        };
    }

    other()
}

/// Category hinted at by keywords or emoji in the message text.
fn hint_category(context: &str) -> Option<LinkCategory> {
    if context.is_empty() {
        return None;
    }
    let lower = context.to_lowercase();
    HINTS
        .iter()
        .find(|(_, words)| words.iter().any(|w| lower.contains(w)))
        .map(|(category, _)| *category)
}

/// `host` equals one of `domains` or is a subdomain of one.
///
/// Plain substring matching would let `netflix.com` pass for `x.com`, so
/// look-alike mirrors such as `fxtwitter.com` do not match either.
fn host_in(host: &str, domains: &[&str]) -> bool {
    domains.iter().any(|d| {
        host.strip_suffix(d)
            .is_some_and(|rest| rest.is_empty() || rest.ends_with('.'))
    })
}

fn is_twitter_host(host: &str) -> bool {
    host_in(host, TWITTER_DOMAINS)
}

fn is_telegram_host(host: &str) -> bool {
    host_in(host, TELEGRAM_DOMAINS)
}

fn is_discord_host(host: &str) -> bool {
    host_in(host, DISCORD_DOMAINS)
}

fn is_reddit_host(host: &str) -> bool {
    host_in(host, REDDIT_DOMAINS)
}

fn is_facebook_host(host: &str) -> bool {
    host_in(host, FACEBOOK_DOMAINS)
}

fn is_instagram_host(host: &str) -> bool {
    host_in(host, INSTAGRAM_DOMAINS)
}

fn is_chart_host(host: &str) -> bool {
    host_in(host, CHART_DOMAINS)
}

fn is_swap_host(host: &str) -> bool {
    host_in(host, SWAP_DOMAINS)
}

fn is_website_host(host: &str) -> bool {
    WEBSITE_TLDS.iter().any(|tld| host.ends_with(tld))
        && !WEBSITE_EXCLUDED.iter().any(|ex| host.contains(ex))
}

fn first_segment(url: &Url) -> Option<&str> {
    url.path_segments()?.next().filter(|s| !s.is_empty())
}

fn verbatim(raw: &str, _url: &Url) -> Option<String> {
    Some(raw.to_string())
}

fn normalize_twitter(_raw: &str, url: &Url) -> Option<String> {
    let handle = first_segment(url)?;
    if TWITTER_RESERVED
        .iter()
        .any(|r| handle.eq_ignore_ascii_case(r))
    {
        return None;
    }
    Some(format!("https://x.com/{handle}"))
}

fn normalize_telegram(_raw: &str, url: &Url) -> Option<String> {
    first_segment(url).map(|s| format!("https://t.me/{s}"))
}

fn normalize_facebook(_raw: &str, url: &Url) -> Option<String> {
    first_segment(url).map(|s| format!("https://facebook.com/{s}"))
}

fn normalize_instagram(_raw: &str, url: &Url) -> Option<String> {
    first_segment(url).map(|s| format!("https://instagram.com/{s}"))
}

fn normalize_reddit(_raw: &str, url: &Url) -> Option<String> {
    let mut segments = url.path_segments()?.filter(|s| !s.is_empty());
    let kind = segments.next()?;
    let name = segments.next()?;
    match kind {
        "r" | "u" => Some(format!("https://reddit.com/{kind}/{name}")),
        _ => None,
    }
}
