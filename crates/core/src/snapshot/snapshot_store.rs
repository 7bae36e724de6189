use std::path::PathBuf;
use std::sync::Mutex;

use crate::errors::StoreError;
use crate::storage;
use crate::Result;

use super::snapshot_model::BalanceSnapshot;

/// Durable cache of the most recent [`BalanceSnapshot`].
///
/// Holds at most one snapshot; [`replace`](Self::replace) discards the
/// previous document entirely.
pub struct SnapshotStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl SnapshotStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    pub fn latest(&self) -> Result<Option<BalanceSnapshot>> {
        let _guard = self.lock.lock().map_err(|_| StoreError::LockPoisoned)?;
        storage::load_or_default(&self.path, || None)
    }

    pub fn replace(&self, snapshot: &BalanceSnapshot) -> Result<()> {
        let _guard = self.lock.lock().map_err(|_| StoreError::LockPoisoned)?;
        storage::persist(&self.path, snapshot)
    }
}
