mod channels;
mod defaults;


pub use channels::*;

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::LinkwatchError;
use defaults::*;

/// Top-level linkwatch configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub channel: ChannelConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

/// General bot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Directory for daily rolling log files. Empty = stdout only.
    #[serde(default)]
    pub log_dir: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            log_level: default_log_level(),
            log_dir: String::new(),
        }
    }
}

/// Status report shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// How many of the latest updates `/status` shows.
    #[serde(default = "default_recent_updates")]
    pub recent_updates: usize,
    /// Characters of each update shown before the ellipsis.
    #[serde(default = "default_update_preview_chars")]
    pub update_preview_chars: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            recent_updates: default_recent_updates(),
            update_preview_chars: default_update_preview_chars(),
        }
    }
}

/// HTTP liveness endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_api_host")]
    pub host: String,
    #[serde(default = "default_api_port")]
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: default_api_host(),
            port: default_api_port(),
        }
    }
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

/// Apply environment overrides on top of a loaded config.
///
/// `BOT_TOKEN` (or `TELEGRAM_BOT_TOKEN`) sets and enables the Telegram channel;
/// `PORT` sets the API port.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<(), LinkwatchError>
where
    F: Fn(&str) -> Option<String>,
{
    let token = lookup("BOT_TOKEN")
        .or_else(|| lookup("TELEGRAM_BOT_TOKEN"))
        .filter(|t| !t.trim().is_empty());
    if let Some(token) = token {
        let tg = config
            .channel
            .telegram
            .get_or_insert_with(TelegramConfig::default);
        tg.bot_token = token.trim().to_string();
        tg.enabled = true;
    }

    if let Some(port) = lookup("PORT").filter(|p| !p.trim().is_empty()) {
        config.api.port = port
            .trim()
            .parse()
            .map_err(|e| LinkwatchError::Config(format!("invalid PORT '{port}': {e}")))?;
    }

    Ok(())
}

/// Load configuration from a TOML file, then apply environment overrides.
///
/// Falls back to defaults if the file does not exist.
pub fn load(path: &str) -> Result<Config, LinkwatchError> {
    let path = Path::new(path);
    let mut config = if path.exists() {
        let content = std::fs::read_to_string(path).map_err(|e| {
            LinkwatchError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content)
            .map_err(|e| LinkwatchError::Config(format!("failed to parse config: {}", e)))?
    } else {
        info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        Config::default()
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    Ok(config)
}
