//! Core domain types shared by the planner, the cache and the hosts

use serde::{Deserialize, Serialize};

/// Guild the reacting identity belongs to, as listed by the directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GuildSummary {
    pub id: u64,
    #[serde(default)]
    pub name: String,
}

/// Custom emoji as listed in a guild's catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct EmojiRecord {
    pub name: String,
    pub id: u64,
}

impl EmojiRecord {
    pub fn new(name: impl Into<String>, id: u64) -> Self {
        Self {
            name: name.into(),
            id,
        }
    }

    /// Reference used in the reaction route: `name:id`
    pub fn reaction_ref(&self) -> String {
        format!("{}:{}", self.name, self.id)
    }
}

/// A registry guild together with the emoji set it hosts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpaceMembership {
    pub space_id: u64,
    pub emojis: Vec<EmojiRecord>,
}

impl SpaceMembership {
    pub fn new(space_id: u64, emojis: Vec<EmojiRecord>) -> Self {
        Self { space_id, emojis }
    }

    /// Find an emoji by its symbolic name.
    pub fn emoji(&self, name: &str) -> Option<&EmojiRecord> {
        self.emojis.iter().find(|e| e.name == name)
    }
}

/// One reaction to add: which character, from which guild, with which emoji
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReactionDirective {
    pub character: char,
    pub space_id: u64,
    pub emoji: EmojiRecord,
}

/// Message the reactions are attached to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TargetMessage {
    pub channel_id: u64,
    pub message_id: u64,
}

impl TargetMessage {
    pub fn new(channel_id: u64, message_id: u64) -> Self {
        Self {
            channel_id,
            message_id,
        }
    }
}
