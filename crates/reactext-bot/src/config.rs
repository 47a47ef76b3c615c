//! Configuration management for reactext-bot

#[path = "config_tests.rs"]
mod config_tests;

use anyhow::{Context, Result};
use reactext_core::RestConfig;
use reactext_types::SpaceRegistry;
use serde::{Deserialize, Serialize};
use std::fs;

/// Source of environment variables; swapped for an in-memory map in tests.
pub trait ReadEnv {
    fn var(&self, key: &str) -> Option<String>;
}

/// The process environment
pub struct SystemEnv;

impl ReadEnv for SystemEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Complete bot configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub discord: DiscordBotConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub reactions: ReactionsConfig,
}

/// Discord bot specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordBotConfig {
    /// Bot token from the Discord developer portal
    #[serde(default = "default_bot_token")]
    pub bot_token: String,
    /// Name of the message context-menu command
    #[serde(default = "default_command_name")]
    pub command_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Emoji guild registry override; the compiled-in list is used when unset
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReactionsConfig {
    #[serde(default)]
    pub guilds: Option<Vec<u64>>,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_env_impl(&SystemEnv)
    }

    pub fn from_env_impl<E: ReadEnv>(env: &E) -> Result<Self> {
        let bot_token = env
            .var("DISCORD_BOT_TOKEN")
            .context("DISCORD_BOT_TOKEN not set")?;

        let command_name = env
            .var("REACTEXT_COMMAND_NAME")
            .unwrap_or_else(default_command_name);

        let base_url = env
            .var("DISCORD_API_BASE")
            .unwrap_or_else(default_base_url);

        let guilds = env
            .var("REACTEXT_GUILDS")
            .map(|s| parse_id_list(&s))
            .filter(|ids| !ids.is_empty());

        Ok(Config {
            discord: DiscordBotConfig {
                bot_token,
                command_name,
            },
            api: ApiConfig { base_url },
            reactions: ReactionsConfig { guilds },
        })
    }

    /// REST client settings for the reacting identity
    pub fn rest(&self) -> RestConfig {
        RestConfig::new(self.discord.bot_token.clone()).with_base_url(self.api.base_url.clone())
    }

    /// Guild registry in priority order
    pub fn registry(&self) -> SpaceRegistry {
        match &self.reactions.guilds {
            Some(ids) if !ids.is_empty() => SpaceRegistry::new(ids.iter().copied()),
            _ => SpaceRegistry::default(),
        }
    }
}

fn default_bot_token() -> String {
    std::env::var("DISCORD_BOT_TOKEN").unwrap_or_default()
}

fn default_command_name() -> String {
    "React with text".to_string()
}

fn default_base_url() -> String {
    RestConfig::default().base_url
}

fn parse_id_list(s: &str) -> Vec<u64> {
    s.split(',')
        .map(|x| x.trim())
        .filter(|x| !x.is_empty())
        .filter_map(|x| x.parse::<u64>().ok())
        .collect()
}
