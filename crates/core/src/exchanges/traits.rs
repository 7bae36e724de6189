use async_trait::async_trait;

use crate::accounts::Account;
use crate::snapshot::AccountResult;

/// Common interface for exchange balance providers.
///
/// `fetch_balances` is infallible from the caller's perspective: adapters
/// absorb their own errors into [`AccountResult::Failure`] so one broken
/// account cannot interrupt a sync run.
#[async_trait]
pub trait ExchangeAdapter: Send + Sync {
    /// Lowercase identifier the registry dispatches on.
    fn exchange_id(&self) -> &'static str;

    async fn fetch_balances(&self, account: &Account) -> AccountResult;
}
