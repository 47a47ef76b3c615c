//! Seams between the core logic and whatever hosts it.
//!
//! `RestClient` implements the network traits against Discord; `mock`
//! provides in-memory versions for tests.

use reactext_types::{EmojiRecord, GuildSummary, Permissions, TargetMessage};

use crate::error::Result;

/// Guild membership and emoji catalogs of the reacting identity
#[allow(async_fn_in_trait)]
pub trait Directory {
    /// `GET /users/@me/guilds`
    async fn list_guilds(&self) -> Result<Vec<GuildSummary>>;

    /// `GET /guilds/{guild_id}/emojis`
    async fn list_emojis(&self, guild_id: u64) -> Result<Vec<EmojiRecord>>;
}

/// Endpoint that attaches one reaction to a message
#[allow(async_fn_in_trait)]
pub trait ReactionSink {
    async fn add_reaction(&self, target: TargetMessage, emoji: &EmojiRecord) -> Result<()>;
}

/// Capability lookup for the invoking user in a channel
pub trait PermissionQuery {
    fn has_permission(&self, permission: Permissions, channel_id: u64) -> bool;
}

/// A permission set already resolved for the channel in question.
impl PermissionQuery for Permissions {
    fn has_permission(&self, permission: Permissions, _channel_id: u64) -> bool {
        self.contains(permission)
    }
}
