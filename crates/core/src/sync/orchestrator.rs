use std::sync::Arc;

use chrono::Utc;
use log::{info, warn};
use tokio::sync::Mutex;

use crate::accounts::AccountStore;
use crate::exchanges::ExchangeRegistry;
use crate::snapshot::{AccountResult, BalanceSnapshot, SnapshotStore};
use crate::state::StateStore;
use crate::Result;

/// Runs full balance syncs across every registered account.
///
/// Both entry points into a sync (the scheduler tick and the manual HTTP
/// trigger) go through [`run_full_sync`](Self::run_full_sync); an internal
/// mutex serializes them so runs never overlap.
pub struct SyncOrchestrator {
    accounts: Arc<AccountStore>,
    registry: Arc<ExchangeRegistry>,
    snapshots: Arc<SnapshotStore>,
    state: Arc<StateStore>,
    run_lock: Mutex<()>,
}

impl SyncOrchestrator {
    pub fn new(
        accounts: Arc<AccountStore>,
        registry: Arc<ExchangeRegistry>,
        snapshots: Arc<SnapshotStore>,
        state: Arc<StateStore>,
    ) -> Self {
        Self {
            accounts,
            registry,
            snapshots,
            state,
            run_lock: Mutex::new(()),
        }
    }

    /// Fetches balances for every account in store order and commits the
    /// assembled snapshot.
    ///
    /// Individual account failures land in the snapshot as data; only
    /// infrastructure problems (store I/O) surface as errors.
    pub async fn run_full_sync(&self) -> Result<BalanceSnapshot> {
        let _flight = self.run_lock.lock().await;

        let accounts = self.accounts.all()?;
        info!(
            "[Sync] Starting full sync across {} accounts",
            accounts.len()
        );

        let mut per_account_results = Vec::with_capacity(accounts.len());
        for account in &accounts {
            let result = self.registry.fetch_balances(account).await;
            if let AccountResult::Failure { error_detail, .. } = &result {
                warn!("[Sync] Account '{}' failed: {}", account.name, error_detail);
            }
            per_account_results.push(result);
        }

        let snapshot = BalanceSnapshot {
            generated_at: Utc::now(),
            per_account_results,
        };

        // Cache first, then state: a crash in between leaves lastSyncAt
        // behind the cache, never ahead of it.
        self.snapshots.replace(&snapshot)?;
        self.state.record_sync_time(snapshot.generated_at)?;

        info!(
            "[Sync] Completed full sync with {} results",
            snapshot.per_account_results.len()
        );
        Ok(snapshot)
    }
}
