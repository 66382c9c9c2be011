//! Operator commands: /start, /help, /connect, /status.

mod connect;
mod start;
mod status;

#[cfg(test)]
mod tests;

use linkwatch_core::{config::TrackerConfig, message::IncomingMessage, traits::Channel};
use linkwatch_tracker::Registry;
use tokio::sync::Mutex;

/// Grouped context for command execution.
pub struct CommandContext<'a> {
    /// Channel the command arrived on, for metadata lookups.
    pub channel: &'a dyn Channel,
    pub registry: &'a Mutex<Registry>,
    pub tracker: &'a TrackerConfig,
    pub incoming: &'a IncomingMessage,
    pub bot_name: &'a str,
}

/// Known bot commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Connect,
    Status,
}

impl Command {
    /// Parse a command from message text. Returns `None` for plain messages,
    /// unknown `/` prefixes, and commands addressed to another bot.
    ///
    /// `/cmd@name` only counts when `name` is `bot_username` (any case).
    pub fn parse(text: &str, bot_username: Option<&str>) -> Option<Self> {
        let first = text.split_whitespace().next()?;
        let cmd = match first.split_once('@') {
            Some((cmd, name)) if is_me(name, bot_username) => cmd,
            Some(_) => return None,
            None => first,
        };
        match cmd {
            "/start" => Some(Self::Start),
            "/help" => Some(Self::Help),
            "/connect" => Some(Self::Connect),
            "/status" => Some(Self::Status),
            _ => None,
        }
    }
}

/// The `@name` a `/command` is addressed to, if any.
pub fn addressee(text: &str) -> Option<&str> {
    let first = text.split_whitespace().next()?;
    if !first.starts_with('/') {
        return None;
    }
    first.split_once('@').map(|(_, name)| name)
}

/// Whether `text` is a `/command@name` meant for some other bot.
pub fn for_other_bot(text: &str, bot_username: Option<&str>) -> bool {
    addressee(text).is_some_and(|name| !is_me(name, bot_username))
}

fn is_me(name: &str, bot_username: Option<&str>) -> bool {
    bot_username.is_some_and(|me| me.eq_ignore_ascii_case(name))
}

/// Handle a command and return the reply text.
pub async fn handle(cmd: Command, ctx: &CommandContext<'_>) -> String {
    match cmd {
        Command::Start => start::handle_start(ctx).await,
        Command::Help => start::handle_help(),
        Command::Connect => connect::handle_connect(ctx).await,
        Command::Status => status::handle_status(ctx).await,
    }
}
