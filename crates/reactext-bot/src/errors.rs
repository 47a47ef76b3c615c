//! Serenity error handling for the interaction surface.
//!
//! Failures while answering interactions or registering the command are
//! classified with the same Discord error codes as reaction failures and
//! logged at a level that matches whether they will recur.

use reactext_types::{DiscordErrorCode, ErrorCategory};
use serenity::http::HttpError;
use tracing::{error, warn};

/// A classified serenity failure
#[derive(Debug, Clone, PartialEq)]
pub struct UiFailure {
    pub error_code: DiscordErrorCode,
    pub category: ErrorCategory,
    pub message: String,
    pub raw_discord_code: u32,
    pub http_status: u16,
    pub is_permanent: bool,
}

/// Classify a serenity `Error`.
pub fn classify(err: &serenity::Error) -> UiFailure {
    match err {
        serenity::Error::Http(HttpError::UnsuccessfulRequest(resp)) => {
            let status = resp.status_code.as_u16();
            if status == 429 {
                return make_failure(DiscordErrorCode::RateLimited, &resp.error.message, 0, status);
            }
            let raw_code = resp.error.code as u32;
            make_failure(
                DiscordErrorCode::from_raw(raw_code),
                &resp.error.message,
                raw_code,
                status,
            )
        }
        _ => make_failure(DiscordErrorCode::NetworkError, &err.to_string(), 0, 0),
    }
}

/// Log a serenity error at the appropriate level.
///
/// - Permanent errors → `error!`
/// - Everything else → `warn!`
pub fn log_error(context: &str, err: &serenity::Error) {
    let failure = classify(err);
    if failure.is_permanent {
        error!(
            "{} [{:?}, HTTP {} / code {}]: {}",
            context,
            failure.error_code,
            failure.http_status,
            failure.raw_discord_code,
            failure.message
        );
    } else {
        warn!("{} [{:?}]: {}", context, failure.error_code, failure.message);
    }
}

fn make_failure(
    code: DiscordErrorCode,
    message: &str,
    raw_discord_code: u32,
    http_status: u16,
) -> UiFailure {
    UiFailure {
        is_permanent: code.is_permanent(),
        category: code.category(),
        error_code: code,
        message: message.to_string(),
        raw_discord_code,
        http_status,
    }
}
