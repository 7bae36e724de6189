//! Coinvault Core - credential vault and balance sync engine.
//!
//! This crate holds the encryption, storage, and exchange-sync logic shared
//! by the HTTP server. It is transport-agnostic: routing, authentication,
//! and scheduling live in the server app.

pub mod accounts;
pub mod cipher;
pub mod errors;
pub mod exchanges;
pub mod snapshot;
pub mod state;
pub mod storage;
pub mod sync;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
