//! Error types for reactext-core

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Failures talking to the Discord REST API
#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Non-success response; `code` is the Discord JSON error code when the
    /// body carried one.
    #[error("Discord API returned {status}: {message}")]
    Status {
        status: u16,
        code: Option<u32>,
        message: String,
        retry_after_secs: Option<f64>,
    },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = Error::Status {
            status: 403,
            code: Some(50013),
            message: "Missing Permissions".to_string(),
            retry_after_secs: None,
        };
        assert_eq!(
            err.to_string(),
            "Discord API returned 403: Missing Permissions"
        );
    }

    #[test]
    fn test_invalid_response_display() {
        let err = Error::InvalidResponse("guild id is not a number".to_string());
        assert_eq!(err.to_string(), "Invalid response: guild id is not a number");
    }

    #[test]
    fn test_config_error_display() {
        let err = Error::Config("empty token".to_string());
        assert_eq!(err.to_string(), "Configuration error: empty token");
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err: serde_json::Error = serde_json::from_str::<i32>("not_a_number").unwrap_err();
        let err: Error = json_err.into();
        assert!(err.to_string().starts_with("Serialization error:"));
    }
}
