//! Shared types for turning text into emoji reactions

pub mod charmap;
pub mod errors;
pub mod permissions;
pub mod registry;
pub mod types;

pub use charmap::{emoji_name, EMPTY_SPACE};
pub use errors::{
    DiscordErrorCode, ErrorCategory, Notice, ReactionFailure, Severity, ValidationError,
};
pub use permissions::Permissions;
pub use registry::SpaceRegistry;
pub use types::*;

/// Longest text, in characters, that can be turned into reactions
pub const MAX_TEXT_LENGTH: usize = 20;

/// Hard ceiling on how often one character may appear, whatever the guild count
pub const MAX_CHARACTER_REPEATS: usize = 6;
