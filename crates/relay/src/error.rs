//! Relay error types

use thiserror::Error;

/// Relay-specific errors
#[derive(Debug, Error)]
pub enum RelayError {
    /// The Scheduler stopped receiving while chunks were still queued
    #[error("scheduler closed with {pending} chunk(s) still queued in relay")]
    DownstreamClosed { pending: usize },
}
