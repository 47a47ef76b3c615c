//! Reactext Discord bot
//!
//! Adds a message context-menu command that spells out text as custom emoji
//! reactions on the chosen message.

mod config;
mod errors;
mod handlers;
mod health;
mod session;
mod view;

use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::Parser;
use reactext_core::RestClient;
use serenity::model::gateway::GatewayIntents;
use serenity::prelude::*;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::handlers::Handler;
use crate::health::HealthState;
use crate::session::AppContext;

/// Reactext bot CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/reactext-bot.toml")]
    config: String,

    /// Discord bot token (overrides config file)
    #[arg(long, env = "DISCORD_BOT_TOKEN")]
    bot_token: Option<String>,

    /// Discord REST API base URL (overrides config file)
    #[arg(long, env = "DISCORD_API_BASE")]
    api_base: Option<String>,

    /// Health check server port
    #[arg(long, env = "HEALTH_CHECK_PORT", default_value = "3001")]
    health_port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reactext_bot=debug,reactext_core=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting reactext bot");

    let args = Args::parse();

    let mut config = if std::path::Path::new(&args.config).exists() {
        info!("Loading config from file: {}", args.config);
        Config::from_file(&args.config)?
    } else {
        info!("Config file not found, loading from environment");
        Config::from_env()?
    };
    if let Some(bot_token) = args.bot_token {
        config.discord.bot_token = bot_token;
    }
    if let Some(api_base) = args.api_base {
        config.api.base_url = api_base;
    }

    let registry = config.registry();
    info!(
        "Command '{}', {} emoji guilds in registry, API at {}",
        config.discord.command_name,
        registry.len(),
        config.api.base_url
    );

    let rest = RestClient::new(config.rest()).context("Invalid REST client configuration")?;
    let app = Arc::new(AppContext::new(
        rest,
        registry,
        config.discord.command_name.clone(),
    ));

    // Interactions arrive regardless of intents
    let intents = GatewayIntents::GUILDS;

    let mut client = Client::builder(&config.discord.bot_token, intents)
        .event_handler(Handler)
        .await
        .context("Failed to create Discord client")?;

    let health_state = HealthState::new();
    {
        let mut data = client.data.write().await;
        data.insert::<AppContext>(app);
        data.insert::<HealthState>(health_state.clone());
    }

    let health_port = args.health_port;
    tokio::spawn(async move {
        if let Err(e) = health::start_health_server(health_state, health_port).await {
            error!("Health server error: {}", e);
        }
    });

    // Graceful shutdown: close all shards on SIGTERM or Ctrl+C.
    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            match signal(SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    tokio::select! {
                        _ = tokio::signal::ctrl_c() => {}
                        _ = sigterm.recv() => {}
                    }
                }
                Err(e) => {
                    error!("Failed to install SIGTERM handler: {}", e);
                    tokio::signal::ctrl_c().await.ok();
                }
            }
        }
        #[cfg(not(unix))]
        {
            tokio::signal::ctrl_c().await.ok();
        }
        info!("Shutdown signal received, stopping Discord client...");
        shard_manager.shutdown_all().await;
    });

    info!("Starting Discord gateway connection...");

    client
        .start()
        .await
        .context("Discord client error")?;

    info!("Reactext bot stopped");
    Ok(())
}
