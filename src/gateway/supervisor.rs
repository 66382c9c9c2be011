//! Channel supervision: forward a channel's stream into the gateway and
//! restart the channel when the stream ends.

use linkwatch_core::{config::RestartConfig, message::IncomingMessage, traits::Channel};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// When, and how often, to restart a channel whose stream ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestartPolicy {
    pub delay: Duration,
    /// Consecutive restarts without a delivered message. 0 = unlimited.
    pub max_restarts: u32,
}

impl RestartPolicy {
    /// Delay before the next restart, or `None` once the limit is reached.
    pub fn next_delay(&self, restarts_so_far: u32) -> Option<Duration> {
        if self.max_restarts != 0 && restarts_so_far >= self.max_restarts {
            return None;
        }
        Some(self.delay)
    }
}

impl From<&RestartConfig> for RestartPolicy {
    fn from(config: &RestartConfig) -> Self {
        Self {
            delay: Duration::from_secs(config.delay_secs),
            max_restarts: config.max_restarts,
        }
    }
}

impl Default for RestartPolicy {
    fn default() -> Self {
        Self::from(&RestartConfig::default())
    }
}

/// Forward `rx` into `tx`; when it closes, restart `channel` per `policy`.
///
/// The restart count resets once a stream delivers a message, so
/// `max_restarts` bounds consecutive failures. Returns when the gateway side
/// is gone or the limit is reached.
pub(super) async fn supervise(
    name: String,
    channel: Arc<dyn Channel>,
    mut rx: mpsc::Receiver<IncomingMessage>,
    tx: mpsc::Sender<IncomingMessage>,
    policy: RestartPolicy,
) {
    let mut restarts: u32 = 0;

    loop {
        while let Some(msg) = rx.recv().await {
            restarts = 0;
            if tx.send(msg).await.is_err() {
                info!("gateway receiver dropped, stopping {name} forwarder");
                return;
            }
        }

        match channel.take_stream_error().await {
            Some(e) => warn!("channel {name} stream ended: {e}"),
            None => warn!("channel {name} stream ended"),
        }

        let Some(delay) = policy.next_delay(restarts) else {
            error!("channel {name} gave up after {restarts} restart(s)");
            return;
        };
        restarts += 1;
        info!("restarting channel {name} in {}s (attempt {restarts})", delay.as_secs());
        tokio::time::sleep(delay).await;

        if tx.is_closed() {
            return;
        }

        rx = match channel.start().await {
            Ok(new_rx) => {
                info!("channel {name} restarted");
                new_rx
            }
            Err(e) => {
                error!("channel {name} failed to restart: {e}");
                // Closed receiver: counts as another ended stream.
                mpsc::channel(1).1
            }
        };
    }
}
