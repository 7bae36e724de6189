use std::collections::HashMap;
use std::sync::Arc;

use log::debug;

use crate::accounts::Account;
use crate::cipher::SecretCipher;
use crate::snapshot::AccountResult;
use crate::Result;

use super::binance::BinanceAdapter;
use super::traits::ExchangeAdapter;

/// Note attached to results for exchanges without an adapter.
pub const UNSUPPORTED_NOTE: &str = "fetch not implemented for this exchange yet";

/// Dispatch table mapping lowercase exchange names to adapters.
///
/// This is the single branch point on exchange identity; everything else
/// in the sync path is adapter-agnostic.
pub struct ExchangeRegistry {
    adapters: HashMap<String, Arc<dyn ExchangeAdapter>>,
}

impl ExchangeRegistry {
    /// Builds a registry with all built-in adapters.
    pub fn with_defaults(cipher: Arc<SecretCipher>) -> Result<Self> {
        let mut registry = Self::empty();
        registry.register(Arc::new(BinanceAdapter::new(cipher)?));
        Ok(registry)
    }

    pub fn empty() -> Self {
        Self {
            adapters: HashMap::new(),
        }
    }

    pub fn register(&mut self, adapter: Arc<dyn ExchangeAdapter>) {
        debug!("[Exchanges] Registered adapter '{}'", adapter.exchange_id());
        self.adapters
            .insert(adapter.exchange_id().to_string(), adapter);
    }

    /// Routes an account to its adapter, or yields an unsupported result
    /// when no adapter claims the exchange. The name is lowercased at
    /// lookup, so dispatch does not depend on how the record was written.
    pub async fn fetch_balances(&self, account: &Account) -> AccountResult {
        match self.adapters.get(&account.exchange.to_lowercase()) {
            Some(adapter) => adapter.fetch_balances(account).await,
            None => AccountResult::Unsupported {
                account_id: account.id.clone(),
                account_name: account.name.clone(),
                exchange: account.exchange.clone(),
                note: UNSUPPORTED_NOTE.to_string(),
            },
        }
    }

    pub fn exchange_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.adapters.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}
