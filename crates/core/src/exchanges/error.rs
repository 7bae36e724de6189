use thiserror::Error;

use super::REQUEST_TIMEOUT_SECS;

/// Errors raised while fetching balances from an exchange.
///
/// These never cross the adapter boundary as errors; callers fold them
/// into failure entries of the snapshot.
#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("Missing API credentials")]
    MissingCredentials,

    #[error("Credential decryption failed: {0}")]
    Credential(String),

    #[error("API request failed: {0}")]
    ApiRequestFailed(String),

    #[error("HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for ExchangeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ExchangeError::Timeout(REQUEST_TIMEOUT_SECS)
        } else {
            ExchangeError::ApiRequestFailed(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ExchangeError {
    fn from(err: serde_json::Error) -> Self {
        ExchangeError::InvalidResponse(err.to_string())
    }
}
