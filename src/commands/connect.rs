//! /connect: snapshot the chat from the platform, then register and backfill.

use super::{addressee, for_other_bot, Command, CommandContext};
use linkwatch_tracker::{connect, ChatSnapshot};
use tracing::{error, warn};

pub(super) const CONNECT_FAILED: &str = "Error connecting, please retry.";

pub(super) async fn handle_connect(ctx: &CommandContext<'_>) -> String {
    let chat = ctx.incoming.chat_id;
    let channel = ctx.channel;

    let info = match channel.fetch_chat(chat).await {
        Ok(info) => info,
        Err(e) => {
            error!("connect: failed to fetch chat {chat}: {e}");
            return CONNECT_FAILED.to_string();
        }
    };

    let pinned_text = match channel.fetch_pinned(chat).await {
        Ok(pinned) => pinned,
        Err(e) => {
            warn!("connect: pinned message unavailable for chat {chat}: {e}");
            None
        }
    };

    let photo_reference = match info.photo_file_id {
        Some(file_id) => match channel.fetch_file_path(&file_id).await {
            Ok(Some(path)) => Some(path),
            Ok(None) => Some(file_id),
            Err(e) => {
                warn!("connect: photo unavailable for chat {chat}: {e}");
                None
            }
        },
        None => None,
    };

    let snapshot = ChatSnapshot {
        title: info.title,
        description: info.description,
        username: info.username,
        photo_reference,
        pinned_text,
    };

    let recent = channel.recent_messages(chat, ctx.incoming.message_id).await;
    let mentions_a_bot = recent
        .iter()
        .any(|m| addressee(m.text_or_empty()).is_some());
    let bot_username = if mentions_a_bot {
        channel.bot_username().await
    } else {
        None
    };

    // Same split as live traffic: our commands and other bots' are not ingested.
    let backlog: Vec<_> = recent
        .into_iter()
        .filter_map(|m| m.text.map(|text| (text, m.timestamp)))
        .filter(|(text, _)| {
            let me = bot_username.as_deref();
            Command::parse(text, me).is_none() && !for_other_bot(text, me)
        })
        .collect();

    let summary = {
        let mut registry = ctx.registry.lock().await;
        connect(&mut registry, chat, snapshot, backlog)
    };
    summary.to_string()
}
