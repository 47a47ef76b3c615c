//! Availability cache: which registry guilds the identity is in, and what
//! emojis each of them hosts.
//!
//! The guild list is fetched on every lookup because its length is the
//! staleness fingerprint. Emoji catalogs are only refetched when that length
//! changes.

use reactext_types::{SpaceMembership, SpaceRegistry};
use tracing::{debug, info, warn};

use crate::host::Directory;

#[derive(Debug, Default)]
pub struct AvailabilityCache {
    entries: Vec<SpaceMembership>,
    /// Guild count seen at the last complete refresh; `None` forces a refetch
    last_guild_count: Option<usize>,
}

impl AvailabilityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached memberships from the last refresh (fetch order).
    pub fn entries(&self) -> &[SpaceMembership] {
        &self.entries
    }

    pub fn last_guild_count(&self) -> Option<usize> {
        self.last_guild_count
    }

    /// Registry guilds the identity belongs to, with their emoji sets.
    ///
    /// Returns an empty list when the guild list cannot be fetched; the
    /// cached entries are left as they were in that case.
    pub async fn get_user_spaces<D: Directory>(
        &mut self,
        directory: &D,
        registry: &SpaceRegistry,
    ) -> Vec<SpaceMembership> {
        let guilds = match directory.list_guilds().await {
            Ok(guilds) => guilds,
            Err(e) => {
                warn!("Failed to list guilds: {}", e);
                return Vec::new();
            }
        };

        let count = guilds.len();
        if !self.entries.is_empty() && self.last_guild_count == Some(count) {
            debug!("Guild count unchanged ({}), reusing cached emoji sets", count);
            return self.entries.clone();
        }

        let mut entries = Vec::new();
        let mut complete = true;

        for guild in guilds.iter().filter(|g| registry.contains(g.id)) {
            match directory.list_emojis(guild.id).await {
                Ok(emojis) => {
                    debug!("Guild {} hosts {} emojis", guild.id, emojis.len());
                    entries.push(SpaceMembership::new(guild.id, emojis));
                }
                Err(e) => {
                    warn!("Failed to list emojis for guild {}: {}", guild.id, e);
                    complete = false;
                }
            }
        }

        info!(
            "Refreshed availability: {} of {} registry guilds joined ({} guilds total)",
            entries.len(),
            registry.len(),
            count
        );

        self.entries = entries;
        self.last_guild_count = complete.then_some(count);
        self.entries.clone()
    }
}
