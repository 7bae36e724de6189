use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use log::debug;

use crate::errors::StoreError;
use crate::storage;
use crate::Result;

use super::state_model::SyncState;

/// Durable holder of the singleton [`SyncState`] document.
pub struct StateStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl StateStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    pub fn get(&self) -> Result<SyncState> {
        let _guard = self.lock.lock().map_err(|_| StoreError::LockPoisoned)?;
        self.load_locked()
    }

    /// Flips the agent toggle and returns the updated state.
    pub fn set_agent_enabled(&self, enabled: bool) -> Result<SyncState> {
        let _guard = self.lock.lock().map_err(|_| StoreError::LockPoisoned)?;
        let mut state = self.load_locked()?;
        state.agent_enabled = enabled;
        storage::persist(&self.path, &state)?;
        debug!("[Agent] Persisted agent_enabled={}", enabled);
        Ok(state)
    }

    /// Records the completion time of a sync run.
    pub fn record_sync_time(&self, at: DateTime<Utc>) -> Result<SyncState> {
        let _guard = self.lock.lock().map_err(|_| StoreError::LockPoisoned)?;
        let mut state = self.load_locked()?;
        state.last_sync_at = Some(at);
        storage::persist(&self.path, &state)?;
        Ok(state)
    }

    fn load_locked(&self) -> Result<SyncState> {
        storage::load_or_default(&self.path, SyncState::default)
    }
}
