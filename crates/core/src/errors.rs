//! Core error types for the coinvault engine.
//!
//! These are transport-agnostic: HTTP status mapping lives in the server
//! app. Per-exchange fetch problems are absent here on purpose - adapters
//! convert them into snapshot data instead of raising them.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the vault/sync engine.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Store operation failed: {0}")]
    Store(#[from] StoreError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Cipher operation failed: {0}")]
    Cipher(#[from] CipherError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Errors raised by the JSON document stores.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading or writing a store file failed.
    #[error("Store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A store document could not be serialized or deserialized.
    #[error("Store document invalid: {0}")]
    Serde(#[from] serde_json::Error),

    /// The store's internal lock was poisoned by a panicking writer.
    #[error("Store lock poisoned")]
    LockPoisoned,
}

/// Validation errors for user input.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Required field '{0}' is missing")]
    MissingField(String),
}

/// Errors raised by the secret cipher.
///
/// All authentication failures surface as `Integrity`; a wrong key and
/// tampered data are indistinguishable to callers.
#[derive(Error, Debug)]
pub enum CipherError {
    /// The authentication tag did not verify.
    #[error("Ciphertext integrity check failed")]
    Integrity,

    /// The encoded ciphertext could not be parsed into nonce/tag/payload.
    #[error("Malformed ciphertext: {0}")]
    Malformed(String),
}

// === From implementations for common error types ===

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Store(StoreError::Io(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Store(StoreError::Serde(err))
    }
}
