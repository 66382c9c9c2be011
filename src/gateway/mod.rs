//! Gateway: the main event loop connecting channels, commands, and the
//! tracking registry.
//!
//! Messages for the same chat are handled one at a time, in arrival order.
//! While a chat has a handler in flight, later messages for it are buffered
//! and drained by that handler, so a slow `/connect` never races the plain
//! messages around it.

mod supervisor;


pub use supervisor::RestartPolicy;

use crate::commands::{self, Command, CommandContext};
use linkwatch_core::{
    config::{ApiConfig, Config, TrackerConfig},
    message::{IncomingMessage, OutgoingMessage},
    traits::Channel,
    ChatId,
};
use linkwatch_tracker::{pipeline, Registry};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error, info, warn};

/// The central gateway that routes messages between channels and the registry.
pub struct Gateway {
    pub(crate) channels: HashMap<String, Arc<dyn Channel>>,
    pub(crate) registry: Arc<Mutex<Registry>>,
    pub(crate) tracker_config: TrackerConfig,
    pub(crate) api_config: ApiConfig,
    pub(crate) restart: RestartPolicy,
    pub(crate) bot_name: String,
    pub(crate) uptime: Instant,
    /// Chats with a handler in flight. New messages for them are buffered here.
    pub(crate) active_chats: Mutex<HashMap<ChatId, Vec<IncomingMessage>>>,
}

impl Gateway {
    /// Create a new gateway.
    pub fn new(channels: HashMap<String, Arc<dyn Channel>>, config: &Config) -> Self {
        let restart = config
            .channel
            .telegram
            .as_ref()
            .map(|tg| RestartPolicy::from(&tg.restart))
            .unwrap_or_default();
        Self {
            channels,
            registry: Arc::new(Mutex::new(Registry::new())),
            tracker_config: config.tracker.clone(),
            api_config: config.api.clone(),
            restart,
            bot_name: config.bot.name.clone(),
            uptime: Instant::now(),
            active_chats: Mutex::new(HashMap::new()),
        }
    }

    /// Run the main event loop until Ctrl-C.
    pub async fn run(self: Arc<Self>) -> anyhow::Result<()> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("failed to listen for shutdown signal: {e}");
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Run the main event loop until `shutdown` resolves.
    pub async fn run_until(
        self: Arc<Self>,
        shutdown: impl Future<Output = ()>,
    ) -> anyhow::Result<()> {
        info!(
            "{} gateway running | channels: {}",
            self.bot_name,
            self.channels.keys().cloned().collect::<Vec<_>>().join(", "),
        );

        let (tx, mut rx) = mpsc::channel::<IncomingMessage>(256);

        let mut forwarders = Vec::new();
        for (name, channel) in &self.channels {
            let channel_rx = channel
                .start()
                .await
                .map_err(|e| anyhow::anyhow!("failed to start channel {name}: {e}"))?;

            forwarders.push(tokio::spawn(supervisor::supervise(
                name.clone(),
                channel.clone(),
                channel_rx,
                tx.clone(),
                self.restart,
            )));

            info!("Channel started: {name}");
        }

        drop(tx);

        // Spawn HTTP health server.
        let api_handle = if self.api_config.enabled {
            let api_cfg = self.api_config.clone();
            let api_registry = self.registry.clone();
            let api_uptime = self.uptime;
            Some(tokio::spawn(async move {
                crate::api::serve(api_cfg, api_registry, api_uptime).await;
            }))
        } else {
            None
        };

        tokio::pin!(shutdown);

        // Main event loop with graceful shutdown.
        loop {
            tokio::select! {
                Some(incoming) = rx.recv() => {
                    self.dispatch_message(incoming).await;
                }
                _ = &mut shutdown => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }

        self.shutdown(&forwarders, &api_handle).await;
        Ok(())
    }

    /// Dispatch a message: buffer it if its chat is busy, otherwise spawn a
    /// handler for the chat.
    ///
    /// Called from the event loop only, so the busy check sees messages in
    /// arrival order.
    pub(crate) async fn dispatch_message(self: &Arc<Self>, incoming: IncomingMessage) {
        let chat_id = incoming.chat_id;

        {
            let mut active = self.active_chats.lock().await;
            if let Some(buffer) = active.get_mut(&chat_id) {
                debug!("buffered message for chat {chat_id} (handler in progress)");
                buffer.push(incoming);
                return;
            }
            // Mark chat as active (empty buffer).
            active.insert(chat_id, Vec::new());
        }

        let gw = self.clone();
        tokio::spawn(async move {
            gw.process_chat(chat_id, incoming).await;
        });
    }

    /// Handle `first`, then drain whatever was buffered for the chat meanwhile.
    async fn process_chat(&self, chat_id: ChatId, first: IncomingMessage) {
        self.handle_message(first).await;

        loop {
            let next = {
                let mut active = self.active_chats.lock().await;
                match active.get_mut(&chat_id) {
                    Some(buf) if !buf.is_empty() => Some(buf.remove(0)),
                    _ => {
                        // No more buffered messages: chat is idle again.
                        active.remove(&chat_id);
                        None
                    }
                }
            };

            match next {
                Some(buffered) => self.handle_message(buffered).await,
                None => break,
            }
        }
    }

    /// Route one message to a command handler or the ingestion pipeline.
    async fn handle_message(&self, incoming: IncomingMessage) {
        let Some(channel) = self.channels.get(&incoming.channel) else {
            warn!("message from unknown channel '{}'", incoming.channel);
            return;
        };

        let text = incoming.text_or_empty();
        let bot_username = match commands::addressee(text) {
            Some(_) => channel.bot_username().await,
            None => None,
        };
        let bot_username = bot_username.as_deref();

        if commands::for_other_bot(text, bot_username) {
            debug!("ignoring command for another bot in chat {}", incoming.chat_id);
            return;
        }

        if let Some(cmd) = Command::parse(text, bot_username) {
            info!("command {cmd:?} in chat {}", incoming.chat_id);
            let ctx = CommandContext {
                channel: channel.as_ref(),
                registry: &self.registry,
                tracker: &self.tracker_config,
                incoming: &incoming,
                bot_name: &self.bot_name,
            };
            let reply = commands::handle(cmd, &ctx).await;
            self.send_text(channel.as_ref(), &incoming, &reply).await;
            return;
        }

        let mut registry = self.registry.lock().await;
        if let Some(ingested) = pipeline::on_message(
            &mut registry,
            incoming.chat_id,
            incoming.text.as_deref(),
            incoming.timestamp,
        ) {
            debug!(
                "ingested message in chat {}: {} url(s), {} new, update={}",
                incoming.chat_id,
                ingested.urls_seen,
                ingested.new_links.len(),
                ingested.is_update
            );
        }
    }

    /// Graceful shutdown: stop forwarders, the API server, and channels.
    async fn shutdown(
        &self,
        forwarders: &[tokio::task::JoinHandle<()>],
        api_handle: &Option<tokio::task::JoinHandle<()>>,
    ) {
        info!("Shutting down...");

        for handle in forwarders {
            handle.abort();
        }
        if let Some(h) = api_handle {
            h.abort();
        }

        for (name, channel) in &self.channels {
            if let Err(e) = channel.stop().await {
                warn!("failed to stop channel {name}: {e}");
            }
        }

        info!("Shutdown complete.");
    }

    /// Send a plain text reply to the message's chat.
    async fn send_text(&self, channel: &dyn Channel, incoming: &IncomingMessage, text: &str) {
        let msg = OutgoingMessage {
            chat_id: incoming.chat_id,
            text: text.to_string(),
        };
        if let Err(e) = channel.send(msg).await {
            error!("failed to send reply to chat {}: {e}", incoming.chat_id);
        }
    }
}
