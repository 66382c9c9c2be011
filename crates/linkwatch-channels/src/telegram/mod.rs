//! Telegram Bot API channel.
//!
//! Uses long polling via `getUpdates` and `sendMessage` for responses.
//! Docs: <https://core.telegram.org/bots/api>

mod backlog;
mod chat;
mod polling;
pub(crate) mod send;
pub(crate) mod types;


use backlog::Backlog;
use linkwatch_core::config::TelegramConfig;
use linkwatch_core::error::LinkwatchError;
use linkwatch_core::ChatId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Telegram channel using the Bot API with long polling.
pub struct TelegramChannel {
    config: TelegramConfig,
    client: reqwest::Client,
    base_url: String,
    /// Tracks the last update_id to avoid reprocessing.
    last_update_id: Arc<Mutex<Option<i64>>>,
    /// Recently seen messages per chat, replayed on connect.
    backlog: Arc<Mutex<Backlog>>,
    /// Set by the poll task when it gives up on the stream.
    stream_error: Arc<Mutex<Option<LinkwatchError>>>,
    /// Bot's own id and username, fetched once via `getMe`.
    me: Mutex<Option<chat::BotIdentity>>,
    /// Pinned text seen by the last `getChat` per chat, taken by `get_pinned`.
    pinned_cache: Mutex<HashMap<ChatId, Option<String>>>,
}

impl TelegramChannel {
    /// Create a new Telegram channel from config.
    pub fn new(config: TelegramConfig) -> Self {
        let base_url = format!("https://api.telegram.org/bot{}", config.bot_token);
        Self::with_base_url(config, base_url)
    }

    /// Create a channel that talks to a custom Bot API server.
    pub fn with_base_url(config: TelegramConfig, base_url: String) -> Self {
        let backlog = Backlog::new(config.backlog_per_chat);
        Self {
            config,
            client: reqwest::Client::new(),
            base_url,
            last_update_id: Arc::new(Mutex::new(None)),
            backlog: Arc::new(Mutex::new(backlog)),
            stream_error: Arc::new(Mutex::new(None)),
            me: Mutex::new(None),
            pinned_cache: Mutex::new(HashMap::new()),
        }
    }
}
