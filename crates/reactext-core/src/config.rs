//! Configuration types for the Discord REST client

use serde::{Deserialize, Serialize};

/// Discord REST API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestConfig {
    /// API root including the version segment
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bot token; sent as `Authorization: Bot <token>`
    #[serde(default, skip_serializing)]
    pub token: String,
}

fn default_base_url() -> String {
    "https://discord.com/api/v10".to_string()
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: String::new(),
        }
    }
}

impl RestConfig {
    /// Create a config for the public Discord API with the given token
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            ..Self::default()
        }
    }

    /// Point the client somewhere else (a proxy, or a mock server in tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Base URL without a trailing slash
    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Value of the `Authorization` header
    pub fn authorization(&self) -> String {
        format!("Bot {}", self.token)
    }
}
