//! In-memory directory and reaction sink for unit testing without Discord.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use reactext_types::{EmojiRecord, GuildSummary, TargetMessage};

use crate::error::{Error, Result};
use crate::host::{Directory, ReactionSink};

/// Captured reaction call: (target message, emoji sent)
pub type CapturedReaction = (TargetMessage, EmojiRecord);

/// Directory backed by a fixed guild list.
///
/// # Example
/// ```rust,ignore
/// let dir = MockDirectory::new().with_guild(10, vec![EmojiRecord::new("A_", 1)]);
/// let spaces = cache.get_user_spaces(&dir, &registry).await;
/// assert_eq!(dir.emoji_requests(), vec![10]);
/// ```
#[derive(Clone, Default)]
pub struct MockDirectory {
    inner: Arc<Mutex<DirectoryState>>,
}

#[derive(Default)]
struct DirectoryState {
    guilds: Vec<(u64, Vec<EmojiRecord>)>,
    fail_guild_list: bool,
    failing_catalogs: HashSet<u64>,
    guild_requests: usize,
    emoji_requests: Vec<u64>,
}

impl MockDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`MockDirectory::add_guild`].
    pub fn with_guild(self, guild_id: u64, emojis: Vec<EmojiRecord>) -> Self {
        self.add_guild(guild_id, emojis);
        self
    }

    /// Join another guild (changes the guild count).
    pub fn add_guild(&self, guild_id: u64, emojis: Vec<EmojiRecord>) {
        self.inner.lock().unwrap().guilds.push((guild_id, emojis));
    }

    /// Make `list_guilds` fail until switched off again.
    pub fn fail_guild_list(&self, fail: bool) {
        self.inner.lock().unwrap().fail_guild_list = fail;
    }

    /// Make `list_emojis` fail for one guild.
    pub fn fail_emojis_for(&self, guild_id: u64) {
        self.inner.lock().unwrap().failing_catalogs.insert(guild_id);
    }

    /// Number of `list_guilds` calls so far.
    pub fn guild_requests(&self) -> usize {
        self.inner.lock().unwrap().guild_requests
    }

    /// Guild ids passed to `list_emojis`, in call order (failed calls included).
    pub fn emoji_requests(&self) -> Vec<u64> {
        self.inner.lock().unwrap().emoji_requests.clone()
    }
}

impl Directory for MockDirectory {
    async fn list_guilds(&self) -> Result<Vec<GuildSummary>> {
        let mut state = self.inner.lock().unwrap();
        state.guild_requests += 1;
        if state.fail_guild_list {
            return Err(Error::InvalidResponse("guild list unavailable".to_string()));
        }
        Ok(state
            .guilds
            .iter()
            .map(|(id, _)| GuildSummary {
                id: *id,
                name: format!("guild-{id}"),
            })
            .collect())
    }

    async fn list_emojis(&self, guild_id: u64) -> Result<Vec<EmojiRecord>> {
        let mut state = self.inner.lock().unwrap();
        state.emoji_requests.push(guild_id);
        if state.failing_catalogs.contains(&guild_id) {
            return Err(Error::Status {
                status: 403,
                code: Some(50001),
                message: "Missing Access".to_string(),
                retry_after_secs: None,
            });
        }
        state
            .guilds
            .iter()
            .find(|(id, _)| *id == guild_id)
            .map(|(_, emojis)| emojis.clone())
            .ok_or_else(|| Error::Status {
                status: 404,
                code: Some(10004),
                message: "Unknown Guild".to_string(),
                retry_after_secs: None,
            })
    }
}

/// Reaction sink that records every call.
#[derive(Clone, Default)]
pub struct MockReactionSink {
    inner: Arc<Mutex<SinkState>>,
}

#[derive(Default)]
struct SinkState {
    calls: Vec<CapturedReaction>,
    failing_calls: HashSet<usize>,
}

impl MockReactionSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the n-th call (0-based) with a permission error.
    pub fn fail_call(&self, index: usize) {
        self.inner.lock().unwrap().failing_calls.insert(index);
    }

    /// Snapshot of all calls in order, including failed ones.
    pub fn calls(&self) -> Vec<CapturedReaction> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.inner.lock().unwrap().calls.len()
    }
}

impl ReactionSink for MockReactionSink {
    async fn add_reaction(&self, target: TargetMessage, emoji: &EmojiRecord) -> Result<()> {
        let mut state = self.inner.lock().unwrap();
        let index = state.calls.len();
        state.calls.push((target, emoji.clone()));
        if state.failing_calls.contains(&index) {
            return Err(Error::Status {
                status: 403,
                code: Some(50013),
                message: "Missing Permissions".to_string(),
                retry_after_secs: None,
            });
        }
        Ok(())
    }
}
