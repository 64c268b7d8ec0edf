//! Pipeline error types

use contracts::ContractError;
use ingestion::IngestionError;
use relay::RelayError;
use scheduler::SchedulerError;
use thiserror::Error;

/// First fatal error raised by any stage
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Invalid settings, detected before any stage starts
    #[error("configuration error: {0}")]
    Config(#[from] ContractError),

    #[error("reader: {0}")]
    Reader(#[from] IngestionError),

    #[error("relay: {0}")]
    Relay(#[from] RelayError),

    #[error("scheduler: {0}")]
    Scheduler(#[from] SchedulerError),

    /// A stage task panicked or was cancelled
    #[error("stage task failed: {message}")]
    StagePanicked { message: String },
}

impl PipelineError {
    /// True for errors that only report that a neighbouring stage stopped
    ///
    /// These are never the root cause; the stage that stopped first carries it.
    pub fn is_secondary(&self) -> bool {
        matches!(
            self,
            Self::Reader(IngestionError::ChannelClosed { .. })
                | Self::Relay(RelayError::DownstreamClosed { .. })
        )
    }
}
