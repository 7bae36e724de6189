//! Accounts module - registration and encrypted storage of exchange credentials.

mod accounts_model;
mod accounts_store;

// Re-export the public interface
pub use accounts_model::{Account, AccountSummary, NewAccount};
pub use accounts_store::AccountStore;
