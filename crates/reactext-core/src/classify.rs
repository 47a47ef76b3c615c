//! Turns REST failures into structured [`ReactionFailure`]s and logs them at
//! a level that matches how actionable they are.

use reactext_types::{DiscordErrorCode, ReactionDirective, ReactionFailure};
use tracing::{error, warn};

use crate::error::Error;

/// Classify the error returned for one reaction call.
pub fn classify(directive: &ReactionDirective, err: &Error) -> ReactionFailure {
    match err {
        Error::Status {
            status,
            code,
            message,
            retry_after_secs,
        } => {
            let error_code = if *status == 429 {
                DiscordErrorCode::RateLimited
            } else {
                code.map(DiscordErrorCode::from_raw)
                    .unwrap_or(DiscordErrorCode::Unknown)
            };
            make_failure(
                directive,
                error_code,
                message,
                *retry_after_secs,
                code.unwrap_or(0),
                *status,
            )
        }
        Error::Http(e) => make_failure(
            directive,
            DiscordErrorCode::NetworkError,
            &e.to_string(),
            None,
            0,
            e.status().map(|s| s.as_u16()).unwrap_or(0),
        ),
        other => make_failure(
            directive,
            DiscordErrorCode::Unknown,
            &other.to_string(),
            None,
            0,
            0,
        ),
    }
}

/// Log a classified failure.
///
/// - Permanent errors → `error!`
/// - Rate limits and transient errors → `warn!`
pub fn log_failure(failure: &ReactionFailure) {
    if failure.is_permanent {
        error!(
            "Reaction {:?} ({}) failed permanently [{:?}, HTTP {} / code {}]: {}",
            failure.character,
            failure.emoji_ref,
            failure.error_code,
            failure.http_status,
            failure.raw_discord_code,
            failure.message
        );
    } else if let Some(secs) = failure.retry_after_secs {
        warn!(
            "Reaction {:?} ({}) rate limited, Discord asked for {:.2}s",
            failure.character, failure.emoji_ref, secs
        );
    } else {
        warn!(
            "Reaction {:?} ({}) failed [{:?}]: {}",
            failure.character, failure.emoji_ref, failure.error_code, failure.message
        );
    }
}

fn make_failure(
    directive: &ReactionDirective,
    code: DiscordErrorCode,
    message: &str,
    retry_after_secs: Option<f64>,
    raw_discord_code: u32,
    http_status: u16,
) -> ReactionFailure {
    let is_permanent = code.is_permanent();
    let category = code.category();
    ReactionFailure {
        character: directive.character,
        emoji_ref: directive.emoji.reaction_ref(),
        error_code: code,
        category,
        message: message.to_string(),
        raw_discord_code,
        http_status,
        retry_after_secs,
        is_permanent,
    }
}
