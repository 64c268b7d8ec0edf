//! ByteSink trait - Scheduler output interface
//!
//! Defines the abstract interface for sinks.

use crate::ContractError;

/// Byte output trait
///
/// All sink implementations must implement this trait.
#[trait_variant::make(ByteSink: Send)]
pub trait LocalByteSink {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Write `bytes`, returning how many were accepted
    ///
    /// A count lower than `bytes.len()` is a short write; callers treat it
    /// as a failure.
    ///
    /// # Errors
    /// Returns write error (should include context)
    async fn write(&mut self, bytes: &[u8]) -> Result<usize, ContractError>;

    /// Flush buffer (if any)
    async fn flush(&mut self) -> Result<(), ContractError>;

    /// Close sink
    async fn close(&mut self) -> Result<(), ContractError>;
}
