//! Error taxonomy shared by the core and the hosts.
//!
//! Three families:
//! - [`ValidationError`]: user-correctable input problems, shown inline in the dialog
//! - [`Notice`]: environment problems that block the dialog from opening (or keep it open)
//! - [`DiscordErrorCode`] / [`ReactionFailure`]: classified REST failures, logged only

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{MAX_CHARACTER_REPEATS, MAX_TEXT_LENGTH};

/// Why a piece of text cannot be turned into reactions.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("Please enter some text.")]
    EmptyText,

    #[error("Text can be at most {} characters long.", MAX_TEXT_LENGTH)]
    TooLong,

    #[error("Only letters, digits, spaces and '!' are supported.")]
    InvalidCharacter,

    #[error("A character can be used at most {} times.", MAX_CHARACTER_REPEATS)]
    TooManyRepeats,

    /// Exactly one character occurs more often than there are joined guilds.
    #[error("Join more of the emoji servers to use '{0}' that many times.")]
    SingleCharacterLimit(char),

    /// Several characters exceed the joined guild count; comma-joined in
    /// order of first occurrence.
    #[error("Join more of the emoji servers to repeat these characters: {0}.")]
    InsufficientSpaces(String),
}

/// Notice severity, mapped by hosts onto their toast styles
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Failure,
}

/// Blocking notices raised by the entry point or while loading the dialog
#[derive(Debug, Clone, Copy, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    #[error("You don't have permission to add reactions in this channel.")]
    NoReactPermission,

    #[error("You don't have permission to use external emojis in this channel.")]
    NoExternalEmojiPermission,

    #[error("Join at least one of the emoji servers to react with text.")]
    NotInRequiredSpace,
}

impl Notice {
    pub fn severity(&self) -> Severity {
        match self {
            Self::NoReactPermission | Self::NoExternalEmojiPermission => Severity::Failure,
            Self::NotInRequiredSpace => Severity::Warning,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// High-level category of a Discord API error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Rate limit hit — must wait before retrying.
    RateLimit,
    /// Channel, message, guild or emoji not found.
    NotFound,
    /// Missing permissions or access for the requested action.
    PermissionDenied,
    /// Target cannot take more reactions.
    LimitReached,
    /// Network or I/O error (transient).
    Network,
    /// Unknown or uncategorised error.
    Unknown,
}

/// Discord JSON error codes that reaction and catalog calls can return.
///
/// See <https://discord.com/developers/docs/topics/opcodes-and-status-codes#json>;
/// anything not listed falls through to [`DiscordErrorCode::Unknown`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DiscordErrorCode {
    // ── Not found ─────────────────────────────────────────────────────────────
    /// 10003 — Unknown channel.
    UnknownChannel,
    /// 10004 — Unknown guild.
    UnknownGuild,
    /// 10008 — Unknown message (likely deleted).
    UnknownMessage,
    /// 10014 — Unknown emoji (deleted from its guild).
    UnknownEmoji,

    // ── Permission errors ──────────────────────────────────────────────────────
    /// 50001 — Missing access.
    MissingAccess,
    /// 50013 — Missing permissions.
    MissingPermissions,
    /// 90001 — Reaction blocked (the author blocked the reacting user).
    ReactionBlocked,

    // ── Rate limiting ──────────────────────────────────────────────────────────
    /// HTTP 429 — Global or per-route rate limit.
    RateLimited,

    // ── Limits ────────────────────────────────────────────────────────────────
    /// 30010 — Maximum number of reactions reached.
    MaxReactionsReached,

    // ── Auth ───────────────────────────────────────────────────────────────────
    /// 40001 / 50014 — Invalid or expired token.
    InvalidToken,

    // ── Server errors ──────────────────────────────────────────────────────────
    /// 130000 — API resource overloaded.
    ApiOverloaded,

    // ── Client errors ─────────────────────────────────────────────────────────
    /// Network or I/O error on the client side.
    NetworkError,

    // ── Catch-all ─────────────────────────────────────────────────────────────
    /// Any Discord JSON error code not listed above.
    Unknown,
}

impl DiscordErrorCode {
    /// Derive the code from a raw Discord JSON error code integer.
    pub fn from_raw(code: u32) -> Self {
        match code {
            10003 => Self::UnknownChannel,
            10004 => Self::UnknownGuild,
            10008 => Self::UnknownMessage,
            10014 => Self::UnknownEmoji,
            30010 => Self::MaxReactionsReached,
            40001 | 50014 => Self::InvalidToken,
            50001 => Self::MissingAccess,
            50013 => Self::MissingPermissions,
            90001 => Self::ReactionBlocked,
            130000 => Self::ApiOverloaded,
            _ => Self::Unknown,
        }
    }

    /// The high-level category for this code.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownChannel | Self::UnknownGuild | Self::UnknownMessage | Self::UnknownEmoji => {
                ErrorCategory::NotFound
            }

            Self::MissingAccess | Self::MissingPermissions | Self::ReactionBlocked => {
                ErrorCategory::PermissionDenied
            }

            Self::RateLimited => ErrorCategory::RateLimit,

            Self::MaxReactionsReached => ErrorCategory::LimitReached,

            Self::NetworkError => ErrorCategory::Network,

            Self::InvalidToken | Self::ApiOverloaded | Self::Unknown => ErrorCategory::Unknown,
        }
    }

    /// True if the same call will keep failing.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            Self::UnknownChannel
                | Self::UnknownGuild
                | Self::UnknownMessage
                | Self::UnknownEmoji
                | Self::MissingAccess
                | Self::MissingPermissions
                | Self::ReactionBlocked
                | Self::MaxReactionsReached
                | Self::InvalidToken
        )
    }

    /// True if retrying the operation after a delay is worthwhile.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::NetworkError | Self::ApiOverloaded
        )
    }
}

/// Classified failure of a single reaction-add call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactionFailure {
    /// Character whose reaction failed.
    pub character: char,
    /// `name:id` of the emoji that was sent.
    pub emoji_ref: String,
    /// Classified Discord error code.
    pub error_code: DiscordErrorCode,
    /// High-level error category.
    pub category: ErrorCategory,
    /// Human-readable error message.
    pub message: String,
    /// Raw Discord JSON error code (0 if not an API error).
    pub raw_discord_code: u32,
    /// HTTP status code (0 if not an HTTP error).
    pub http_status: u16,
    /// Seconds Discord asked us to wait (rate limits only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_secs: Option<f64>,
    /// True if the call would fail again unchanged.
    pub is_permanent: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── ValidationError messages ──────────────────────────────────────────────

    #[test]
    fn test_validation_messages_mention_limits() {
        assert!(ValidationError::TooLong.to_string().contains("20"));
        assert!(ValidationError::TooManyRepeats.to_string().contains('6'));
    }

    #[test]
    fn test_validation_messages_carry_characters() {
        assert!(ValidationError::SingleCharacterLimit('A')
            .to_string()
            .contains("'A'"));
        assert!(ValidationError::InsufficientSpaces("A, B".to_string())
            .to_string()
            .contains("A, B"));
    }

    #[test]
    fn test_validation_error_serde() {
        let json = serde_json::to_string(&ValidationError::SingleCharacterLimit('Q')).unwrap();
        assert_eq!(json, r#"{"kind":"single_character_limit","detail":"Q"}"#);
        let back: ValidationError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ValidationError::SingleCharacterLimit('Q'));
    }

    // ── Notice ────────────────────────────────────────────────────────────────

    #[test]
    fn test_notice_severity() {
        assert_eq!(Notice::NoReactPermission.severity(), Severity::Failure);
        assert_eq!(Notice::NoExternalEmojiPermission.severity(), Severity::Failure);
        assert_eq!(Notice::NotInRequiredSpace.severity(), Severity::Warning);
    }

    #[test]
    fn test_notice_messages_differ() {
        assert_ne!(
            Notice::NoReactPermission.message(),
            Notice::NoExternalEmojiPermission.message()
        );
    }

    // ── DiscordErrorCode::from_raw ────────────────────────────────────────────

    #[test]
    fn test_from_raw_known_codes() {
        assert_eq!(
            DiscordErrorCode::from_raw(10008),
            DiscordErrorCode::UnknownMessage
        );
        assert_eq!(
            DiscordErrorCode::from_raw(10014),
            DiscordErrorCode::UnknownEmoji
        );
        assert_eq!(
            DiscordErrorCode::from_raw(30010),
            DiscordErrorCode::MaxReactionsReached
        );
        assert_eq!(
            DiscordErrorCode::from_raw(50013),
            DiscordErrorCode::MissingPermissions
        );
        assert_eq!(
            DiscordErrorCode::from_raw(90001),
            DiscordErrorCode::ReactionBlocked
        );
    }

    #[test]
    fn test_from_raw_token_aliases() {
        assert_eq!(
            DiscordErrorCode::from_raw(40001),
            DiscordErrorCode::InvalidToken
        );
        assert_eq!(
            DiscordErrorCode::from_raw(50014),
            DiscordErrorCode::InvalidToken
        );
    }

    #[test]
    fn test_from_raw_unknown_falls_through() {
        assert_eq!(DiscordErrorCode::from_raw(99999), DiscordErrorCode::Unknown);
        assert_eq!(DiscordErrorCode::from_raw(0), DiscordErrorCode::Unknown);
    }

    // ── DiscordErrorCode::category ────────────────────────────────────────────

    #[test]
    fn test_categories() {
        assert_eq!(
            DiscordErrorCode::UnknownEmoji.category(),
            ErrorCategory::NotFound
        );
        assert_eq!(
            DiscordErrorCode::ReactionBlocked.category(),
            ErrorCategory::PermissionDenied
        );
        assert_eq!(
            DiscordErrorCode::MaxReactionsReached.category(),
            ErrorCategory::LimitReached
        );
        assert_eq!(
            DiscordErrorCode::RateLimited.category(),
            ErrorCategory::RateLimit
        );
        assert_eq!(
            DiscordErrorCode::NetworkError.category(),
            ErrorCategory::Network
        );
    }

    // ── permanence / retry ────────────────────────────────────────────────────

    #[test]
    fn test_is_permanent() {
        for code in [
            DiscordErrorCode::UnknownMessage,
            DiscordErrorCode::UnknownEmoji,
            DiscordErrorCode::MissingPermissions,
            DiscordErrorCode::MaxReactionsReached,
            DiscordErrorCode::InvalidToken,
        ] {
            assert!(code.is_permanent(), "{:?} should be permanent", code);
        }
        for code in [
            DiscordErrorCode::RateLimited,
            DiscordErrorCode::NetworkError,
            DiscordErrorCode::ApiOverloaded,
            DiscordErrorCode::Unknown,
        ] {
            assert!(!code.is_permanent(), "{:?} should not be permanent", code);
        }
    }

    #[test]
    fn test_is_retryable() {
        assert!(DiscordErrorCode::RateLimited.is_retryable());
        assert!(DiscordErrorCode::ApiOverloaded.is_retryable());
        assert!(!DiscordErrorCode::UnknownMessage.is_retryable());
    }

    #[test]
    fn test_reaction_failure_retry_after_omitted_when_none() {
        let failure = ReactionFailure {
            character: 'A',
            emoji_ref: "A_:1".to_string(),
            error_code: DiscordErrorCode::Unknown,
            category: ErrorCategory::Unknown,
            message: "err".to_string(),
            raw_discord_code: 0,
            http_status: 500,
            retry_after_secs: None,
            is_permanent: false,
        };
        let json = serde_json::to_string(&failure).unwrap();
        assert!(!json.contains("retry_after_secs"));
    }
}
