use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single asset position as reported by an exchange.
///
/// Amounts stay in the exchange's decimal-string form; no arithmetic is
/// performed on them downstream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AssetBalance {
    pub asset: String,
    pub free: String,
    pub locked: String,
}

/// Outcome of fetching balances for one account.
///
/// Failures are data here, not errors: a bad credential or an exchange
/// outage must never poison the other accounts in a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum AccountResult {
    Success {
        account_id: String,
        account_name: String,
        exchange: String,
        balances: Vec<AssetBalance>,
    },
    Failure {
        account_id: String,
        account_name: String,
        exchange: String,
        error_detail: String,
    },
    Unsupported {
        account_id: String,
        account_name: String,
        exchange: String,
        note: String,
    },
}

impl AccountResult {
    pub fn account_id(&self) -> &str {
        match self {
            AccountResult::Success { account_id, .. }
            | AccountResult::Failure { account_id, .. }
            | AccountResult::Unsupported { account_id, .. } => account_id,
        }
    }
}

/// One complete sync run, replaced wholesale on every sync.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSnapshot {
    pub generated_at: DateTime<Utc>,
    pub per_account_results: Vec<AccountResult>,
}
