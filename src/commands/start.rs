//! /start and /help.

use super::CommandContext;
use tracing::warn;

pub(super) const ADMIN_NEEDED: &str =
    "Please make me an admin in this chat so I can read and track its messages.";

pub(super) async fn handle_start(ctx: &CommandContext<'_>) -> String {
    let incoming = ctx.incoming;
    if incoming.chat_kind.is_private() {
        return format!(
            "Hello! I am {}.\n\n\
             I track the links and announcements shared in your project's \
             group or channel.\n\n\
             1. Add me to the group or channel as an admin.\n\
             2. Send /connect there.\n\
             3. Send /status any time for a summary.\n\n\
             Type /help to see what I can do!",
            ctx.bot_name
        );
    }

    match ctx.channel.fetch_bot_member(incoming.chat_id).await {
        Ok(Some(member)) if member.can_post(incoming.chat_kind) => ready_message(),
        Ok(Some(member)) => {
            warn!(
                "start: bot is '{}' in chat {}, not an admin",
                member.status, incoming.chat_id
            );
            ADMIN_NEEDED.to_string()
        }
        // Platform has no notion of membership; assume we can post.
        Ok(None) => ready_message(),
        Err(e) => {
            warn!("start: membership check failed for chat {}: {e}", incoming.chat_id);
            ADMIN_NEEDED.to_string()
        }
    }
}

fn ready_message() -> String {
    "I'm ready here. Send /connect to start tracking links and updates.".to_string()
}

pub(super) fn handle_help() -> String {
    "Available Commands:\n\n\
     /start - Start the bot\n\
     /help - Show this help message\n\
     /connect - Start tracking this chat\n\
     /status - Check your project status"
        .to_string()
}
