//! Exchanges module - adapters that turn stored credentials into balances.

mod binance;
mod error;
mod registry;
mod traits;

// Re-export the public interface
pub use binance::BinanceAdapter;
pub use error::ExchangeError;
pub use registry::{ExchangeRegistry, UNSUPPORTED_NOTE};
pub use traits::ExchangeAdapter;

/// Outbound request timeout. A slow exchange becomes a failure entry in the
/// snapshot instead of stalling the whole sync.
pub const REQUEST_TIMEOUT_SECS: u64 = 8;
