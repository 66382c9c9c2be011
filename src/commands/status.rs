//! /status: report what has been tracked for the chat.

use super::CommandContext;
use linkwatch_tracker::status;

pub(super) const NOT_CONNECTED: &str = "This chat is not connected yet. Send /connect first.";

pub(super) async fn handle_status(ctx: &CommandContext<'_>) -> String {
    let registry = ctx.registry.lock().await;
    match status(&registry, ctx.incoming.chat_id, ctx.tracker) {
        Some(report) => report.to_string(),
        None => NOT_CONNECTED.to_string(),
    }
}
