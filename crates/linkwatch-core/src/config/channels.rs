use super::defaults::*;
use serde::{Deserialize, Serialize};

/// Channel configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ChannelConfig {
    pub telegram: Option<TelegramConfig>,
}

/// Telegram bot config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub bot_token: String,
    /// Chats the bot will serve. Empty = all chats.
    #[serde(default)]
    pub allowed_chats: Vec<i64>,
    /// Server-side long-poll timeout for `getUpdates`.
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,
    /// Recent messages retained per chat for `/connect` backfill. 0 disables.
    #[serde(default = "default_backlog_per_chat")]
    pub backlog_per_chat: usize,
    #[serde(default)]
    pub restart: RestartConfig,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            bot_token: String::new(),
            allowed_chats: Vec::new(),
            poll_timeout_secs: default_poll_timeout(),
            backlog_per_chat: default_backlog_per_chat(),
            restart: RestartConfig::default(),
        }
    }
}

/// Restart policy applied when the update stream ends (e.g. polling conflict).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestartConfig {
    #[serde(default = "default_restart_delay")]
    pub delay_secs: u64,
    /// Maximum restarts before giving up. 0 = unlimited.
    #[serde(default)]
    pub max_restarts: u32,
}

impl Default for RestartConfig {
    fn default() -> Self {
        Self {
            delay_secs: default_restart_delay(),
            max_restarts: 0,
        }
    }
}
