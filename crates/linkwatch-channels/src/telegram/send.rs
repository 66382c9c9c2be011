//! Message sending and command registration.

use super::TelegramChannel;
use crate::utils::split_message;
use linkwatch_core::{error::LinkwatchError, ChatId};
use tracing::{info, warn};

/// Bot API hard limit for one message.
const MAX_MESSAGE_LEN: usize = 4096;

impl TelegramChannel {
    /// Send a plain-text message to a chat, split to fit the length limit.
    pub(crate) async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
    ) -> Result<(), LinkwatchError> {
        let url = format!("{}/sendMessage", self.base_url);

        for chunk in split_message(text, MAX_MESSAGE_LEN) {
            let body = serde_json::json!({
                "chat_id": chat_id,
                "text": chunk,
                "disable_web_page_preview": true,
            });

            let resp = self
                .client
                .post(&url)
                .json(&body)
                .send()
                .await
                .map_err(|e| LinkwatchError::Channel(format!("telegram send failed: {e}")))?;

            let status = resp.status();
            if !status.is_success() {
                let error_text = resp.text().await.unwrap_or_default();
                return Err(LinkwatchError::Channel(format!(
                    "telegram send failed ({status}): {error_text}"
                )));
            }
        }

        Ok(())
    }

    /// Register bot commands with Telegram so users see an autocomplete menu.
    /// Best-effort: logs failures but does not propagate errors.
    pub(crate) async fn register_commands(&self) {
        let commands = serde_json::json!({
            "commands": [
                { "command": "start", "description": "Start the bot" },
                { "command": "help", "description": "Show available commands" },
                { "command": "connect", "description": "Start tracking this chat" },
                { "command": "status", "description": "Links and updates tracked here" },
            ]
        });

        let url = format!("{}/setMyCommands", self.base_url);
        match self.client.post(&url).json(&commands).send().await {
            Ok(resp) if resp.status().is_success() => {
                info!("registered Telegram bot commands");
            }
            Ok(resp) => {
                let body = resp.text().await.unwrap_or_default();
                warn!("failed to register Telegram bot commands: {body}");
            }
            Err(e) => {
                warn!("failed to register Telegram bot commands: {e}");
            }
        }
    }
}
