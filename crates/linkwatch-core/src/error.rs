use thiserror::Error;

/// Top-level error type for linkwatch.
#[derive(Debug, Error)]
pub enum LinkwatchError {
    /// Error from a messaging channel (transport, API, or decoding).
    #[error("channel error: {0}")]
    Channel(String),

    /// Another poller holds the update stream for this bot token.
    #[error("polling conflict: {0}")]
    Conflict(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),
}
