//! Sync state module - the agent toggle and last sync timestamp.

mod state_model;
mod state_store;

// Re-export the public interface
pub use state_model::SyncState;
pub use state_store::StateStore;
