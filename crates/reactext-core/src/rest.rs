//! Discord REST client for the three calls the reaction flow needs.

use reactext_types::{EmojiRecord, GuildSummary, TargetMessage};
use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::debug;

use crate::config::RestConfig;
use crate::error::{Error, Result};
use crate::host::{Directory, ReactionSink};

#[derive(Clone)]
pub struct RestClient {
    client: Client,
    config: RestConfig,
}

#[derive(Deserialize)]
struct WireGuild {
    id: String,
    #[serde(default)]
    name: String,
}

#[derive(Deserialize)]
struct WireEmoji {
    id: Option<String>,
    name: Option<String>,
}

#[derive(Deserialize, Default)]
struct WireError {
    code: Option<u32>,
    #[serde(default)]
    message: String,
    retry_after: Option<f64>,
}

impl RestClient {
    pub fn new(config: RestConfig) -> Result<Self> {
        if config.token.trim().is_empty() {
            return Err(Error::Config("bot token is empty".to_string()));
        }
        Ok(Self {
            client: Client::new(),
            config,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base(), path)
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .client
            .get(self.url(path))
            .header("Authorization", self.config.authorization())
            .send()
            .await?;
        let response = check(response).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Turn a non-success response into [`Error::Status`].
async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.unwrap_or_default();
    let body: WireError = serde_json::from_str(&text).unwrap_or_default();
    let message = if body.message.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    } else {
        body.message
    };
    Err(Error::Status {
        status: status.as_u16(),
        code: body.code,
        message,
        retry_after_secs: body.retry_after,
    })
}

fn parse_id(raw: &str, what: &str) -> Result<u64> {
    raw.parse()
        .map_err(|_| Error::InvalidResponse(format!("{what} id {raw:?} is not a snowflake")))
}

/// Percent-encode everything outside the RFC 3986 unreserved set.
pub fn encode_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            other => out.push_str(&format!("%{other:02X}")),
        }
    }
    out
}

impl Directory for RestClient {
    async fn list_guilds(&self) -> Result<Vec<GuildSummary>> {
        let guilds: Vec<WireGuild> = self.get("/users/@me/guilds").await?;
        debug!("Identity is in {} guilds", guilds.len());
        guilds
            .into_iter()
            .map(|g| {
                Ok(GuildSummary {
                    id: parse_id(&g.id, "guild")?,
                    name: g.name,
                })
            })
            .collect()
    }

    async fn list_emojis(&self, guild_id: u64) -> Result<Vec<EmojiRecord>> {
        let emojis: Vec<WireEmoji> = self.get(&format!("/guilds/{guild_id}/emojis")).await?;
        let mut records = Vec::with_capacity(emojis.len());
        for emoji in emojis {
            // deleted emojis come back without a name or id
            let (Some(id), Some(name)) = (emoji.id, emoji.name) else {
                continue;
            };
            records.push(EmojiRecord::new(name, parse_id(&id, "emoji")?));
        }
        Ok(records)
    }
}

impl ReactionSink for RestClient {
    async fn add_reaction(&self, target: TargetMessage, emoji: &EmojiRecord) -> Result<()> {
        let path = format!(
            "/channels/{}/messages/{}/reactions/{}/@me",
            target.channel_id,
            target.message_id,
            encode_component(&emoji.reaction_ref())
        );
        let response = self
            .client
            .put(self.url(&path))
            .query(&[("location", "Message"), ("type", "0")])
            .header("Authorization", self.config.authorization())
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }
}
