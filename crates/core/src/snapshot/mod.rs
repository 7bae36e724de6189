//! Snapshot module - the materialized balance cache.

mod snapshot_model;
mod snapshot_store;

// Re-export the public interface
pub use snapshot_model::{AccountResult, AssetBalance, BalanceSnapshot};
pub use snapshot_store::SnapshotStore;
