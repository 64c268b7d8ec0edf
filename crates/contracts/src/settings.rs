//! DelaySettings - validated pipeline configuration

use std::time::Duration;

use crate::ContractError;

/// Hold time used when none is configured
pub const DEFAULT_DELAY: Duration = Duration::from_secs(60);

/// Maximum bytes requested by one read
pub const DEFAULT_CHUNK_SIZE: usize = 1 << 10;

/// Upper bound accepted for `chunk_size`
pub const MAX_CHUNK_SIZE: usize = 1 << 20;

/// Immutable settings shared by the Reader (chunk size) and the Scheduler (delay).
///
/// `Duration` cannot be negative, so a negative delay is rejected while parsing,
/// before a `DelaySettings` can exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelaySettings {
    /// How long each chunk is held after arrival
    pub delay: Duration,

    /// Read buffer size in bytes
    pub chunk_size: usize,
}

impl Default for DelaySettings {
    fn default() -> Self {
        Self {
            delay: DEFAULT_DELAY,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl DelaySettings {
    /// Create validated settings
    ///
    /// # Errors
    /// `ConfigValidation` if `chunk_size` is outside `1..=MAX_CHUNK_SIZE`
    pub fn new(delay: Duration, chunk_size: usize) -> Result<Self, ContractError> {
        let settings = Self { delay, chunk_size };
        settings.validate()?;
        Ok(settings)
    }

    /// Default chunk size with the given delay
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Default::default()
        }
    }

    /// Check invariants that the type system does not enforce
    pub fn validate(&self) -> Result<(), ContractError> {
        if self.chunk_size == 0 || self.chunk_size > MAX_CHUNK_SIZE {
            return Err(ContractError::config_validation(
                "chunk_size",
                format!(
                    "chunk_size must be in 1..={MAX_CHUNK_SIZE}, got {}",
                    self.chunk_size
                ),
            ));
        }
        Ok(())
    }
}
