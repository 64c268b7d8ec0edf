//! Scheduler error types

use contracts::ContractError;
use thiserror::Error;

/// Scheduler-specific errors, all fatal to the pipeline
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The sink rejected a write
    #[error("output error: {source}")]
    Write {
        sink_name: String,
        #[source]
        source: ContractError,
    },

    /// The sink accepted fewer bytes than supplied
    #[error("short write to '{sink_name}': {written} != {expected}")]
    ShortWrite {
        sink_name: String,
        written: usize,
        expected: usize,
    },

    /// Flushing or closing the sink after the drain failed
    #[error("failed to close sink '{sink_name}': {source}")]
    Close {
        sink_name: String,
        #[source]
        source: ContractError,
    },
}
