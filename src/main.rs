mod api;
mod commands;
mod gateway;

#[cfg(test)]
mod test_support;

use clap::{Parser, Subcommand};
use linkwatch_channels::telegram::TelegramChannel;
use linkwatch_core::{config, traits::Channel};
use std::collections::HashMap;
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "linkwatch",
    version,
    about = "linkwatch: tracks the links and updates shared in Telegram chats"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot.
    Start,
    /// Check configuration and channel readiness.
    Check,
    /// Classify a URL offline.
    Classify {
        /// The URL to classify.
        url: String,
        /// Message text the URL appeared in.
        #[arg(long)]
        context: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    match cli.command {
        Commands::Start => {
            let cfg = config::load(&cli.config)?;
            let _guard = init_logging(&cfg.bot);

            let mut channels: HashMap<String, Arc<dyn Channel>> = HashMap::new();

            if let Some(ref tg) = cfg.channel.telegram {
                if tg.enabled {
                    if tg.bot_token.is_empty() {
                        anyhow::bail!(
                            "Telegram is enabled but bot_token is empty. \
                             Set it in config.toml or the BOT_TOKEN env var."
                        );
                    }
                    let channel = TelegramChannel::new(tg.clone());
                    channels.insert("telegram".to_string(), Arc::new(channel));
                }
            }

            if channels.is_empty() {
                anyhow::bail!("No channels enabled. Set BOT_TOKEN or enable [channel.telegram].");
            }

            tracing::info!("{} starting", cfg.bot.name);
            let gw = Arc::new(gateway::Gateway::new(channels, &cfg));
            gw.run().await?;
        }
        Commands::Check => {
            let cfg = config::load(&cli.config)?;
            println!("linkwatch: configuration check\n");
            println!("Config: {}", cli.config);
            println!("Bot name: {}", cfg.bot.name);
            println!();

            match cfg.channel.telegram {
                Some(ref tg) => println!(
                    "  telegram: {}",
                    if tg.enabled && !tg.bot_token.is_empty() {
                        "configured"
                    } else if tg.enabled {
                        "enabled but missing bot_token"
                    } else {
                        "disabled"
                    }
                ),
                None => println!("  telegram: not configured"),
            }

            if cfg.api.enabled {
                println!("  api: listening on {}:{}", cfg.api.host, cfg.api.port);
            } else {
                println!("  api: disabled");
            }
        }
        Commands::Classify { url, context } => {
            let link = linkwatch_tracker::classify_with_context(
                &url,
                context.as_deref().unwrap_or(""),
            );
            println!("{}\t{}", link.category, link.url);
        }
    }

    Ok(())
}

/// Console logging, plus a daily rolling file when `log_dir` is set.
///
/// The returned guard flushes the file writer on drop; keep it alive.
fn init_logging(bot: &config::BotConfig) -> Option<WorkerGuard> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&bot.log_level));

    let (file_layer, guard) = if bot.log_dir.is_empty() {
        (None, None)
    } else {
        let appender =
            tracing_appender::rolling::daily(config::shellexpand(&bot.log_dir), "linkwatch.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = fmt::layer().with_writer(writer).with_ansi(false);
        (Some(layer), Some(guard))
    };

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false))
        .with(file_layer)
        .try_init();

    guard
}
