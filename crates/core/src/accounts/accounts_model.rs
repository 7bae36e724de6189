//! Exchange account domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{errors::ValidationError, Error, Result};

/// A configured exchange account as persisted in the registry.
///
/// `api_secret_cipher` and `passphrase_cipher` hold secret-cipher output;
/// plaintext secrets never reach this struct. The API key itself is treated
/// as a non-secret identifier, mirroring how exchanges display it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    /// Lowercase exchange identifier, e.g. "binance".
    pub exchange: String,
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_secret_cipher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passphrase_cipher: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input model for registering a new exchange account.
///
/// Required fields default to empty strings so that missing JSON keys reach
/// [`validate`](Self::validate) instead of failing deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub exchange: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub api_secret: Option<String>,
    #[serde(default)]
    pub passphrase: Option<String>,
}

impl NewAccount {
    /// Validates the new account data.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "name".to_string(),
            )));
        }
        if self.exchange.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "exchange".to_string(),
            )));
        }
        if self.api_key.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "apiKey".to_string(),
            )));
        }
        Ok(())
    }
}

/// Redacted account view safe for listing: identity and metadata only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub id: String,
    pub name: String,
    pub exchange: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.clone(),
            name: account.name.clone(),
            exchange: account.exchange.clone(),
            created_at: account.created_at,
        }
    }
}
