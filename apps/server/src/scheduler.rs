//! Background scheduler for periodic balance sync.
//!
//! Ticks at the configured interval and defers to the agent toggle on
//! every tick; a disabled agent skips the run but keeps the timer alive.

use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::main_lib::AppState;

/// Initial delay before first sync (let the server finish starting up)
const INITIAL_DELAY_SECS: u64 = 5;

/// Handle to the running scheduler task.
pub struct SchedulerHandle {
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Tears down the timer loop. A sync already in flight keeps running
    /// to completion under the orchestrator's lock.
    pub fn stop(self) {
        self.task.abort();
    }
}

/// Starts the background balance sync scheduler.
pub fn start_sync_scheduler(state: Arc<AppState>, interval_secs: u64) -> SchedulerHandle {
    let task = tokio::spawn(async move {
        info!("Balance sync scheduler started ({}s interval)", interval_secs);

        // Initial delay before first sync
        tokio::time::sleep(Duration::from_secs(INITIAL_DELAY_SECS)).await;

        let mut sync_interval = interval(Duration::from_secs(interval_secs));
        // A sync slower than the interval delays the next tick instead of
        // queueing a burst of catch-up runs.
        sync_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            sync_interval.tick().await;
            run_scheduled_sync(&state).await;
        }
    });
    SchedulerHandle { task }
}

/// Runs a single scheduled sync operation.
///
/// Never propagates errors; a failed tick is logged and the next tick
/// proceeds as usual.
async fn run_scheduled_sync(state: &Arc<AppState>) {
    let sync_state = match state.sync_state.get() {
        Ok(s) => s,
        Err(e) => {
            warn!("Scheduled sync skipped: failed to read sync state: {}", e);
            return;
        }
    };

    if !sync_state.agent_enabled {
        debug!("Scheduled sync skipped: agent mode disabled");
        return;
    }

    info!("Running scheduled balance sync...");
    match state.orchestrator.run_full_sync().await {
        Ok(snapshot) => {
            info!(
                "Scheduled balance sync completed: {} accounts",
                snapshot.per_account_results.len()
            );
        }
        Err(e) => {
            warn!("Scheduled balance sync failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AdminCredentials;
    use coinvault_core::accounts::AccountStore;
    use coinvault_core::cipher::SecretCipher;
    use coinvault_core::exchanges::ExchangeRegistry;
    use coinvault_core::snapshot::SnapshotStore;
    use coinvault_core::state::StateStore;
    use coinvault_core::sync::SyncOrchestrator;
    use tempfile::tempdir;

    fn test_state(dir: &std::path::Path) -> Arc<AppState> {
        let cipher = Arc::new(SecretCipher::new("test-secret"));
        let accounts = Arc::new(AccountStore::new(dir.join("accounts.json"), cipher));
        let sync_state = Arc::new(StateStore::new(dir.join("state.json")));
        let snapshots = Arc::new(SnapshotStore::new(dir.join("cache.json")));
        let orchestrator = Arc::new(SyncOrchestrator::new(
            accounts.clone(),
            Arc::new(ExchangeRegistry::empty()),
            snapshots.clone(),
            sync_state.clone(),
        ));
        Arc::new(AppState {
            accounts,
            sync_state,
            snapshots,
            orchestrator,
            admin: AdminCredentials::new("admin", "password"),
        })
    }

    #[tokio::test]
    async fn disabled_agent_tick_changes_nothing() {
        let dir = tempdir().unwrap();
        let state = test_state(dir.path());

        run_scheduled_sync(&state).await;

        assert!(state.sync_state.get().unwrap().last_sync_at.is_none());
        assert!(state.snapshots.latest().unwrap().is_none());
    }

    #[tokio::test]
    async fn enabled_agent_tick_commits_a_snapshot() {
        let dir = tempdir().unwrap();
        let state = test_state(dir.path());
        state.sync_state.set_agent_enabled(true).unwrap();

        run_scheduled_sync(&state).await;

        let sync_state = state.sync_state.get().unwrap();
        assert!(sync_state.last_sync_at.is_some());
        assert!(state.snapshots.latest().unwrap().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn scheduler_ticks_after_the_initial_delay() {
        let dir = tempdir().unwrap();
        let state = test_state(dir.path());
        state.sync_state.set_agent_enabled(true).unwrap();

        let handle = start_sync_scheduler(state.clone(), 3600);
        // Cross the startup delay and the first tick on the paused clock.
        tokio::time::sleep(Duration::from_secs(INITIAL_DELAY_SECS + 1)).await;
        handle.stop();

        assert!(state.sync_state.get().unwrap().last_sync_at.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn stopped_scheduler_never_ticks() {
        let dir = tempdir().unwrap();
        let state = test_state(dir.path());
        state.sync_state.set_agent_enabled(true).unwrap();

        let handle = start_sync_scheduler(state.clone(), 3600);
        handle.stop();

        tokio::time::sleep(Duration::from_secs(INITIAL_DELAY_SECS + 1)).await;
        assert!(state.sync_state.get().unwrap().last_sync_at.is_none());
    }
}
