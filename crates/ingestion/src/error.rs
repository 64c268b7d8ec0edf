//! Ingestion error types

use contracts::ContractError;
use thiserror::Error;

/// Ingestion error
#[derive(Debug, Error)]
pub enum IngestionError {
    /// The source failed with something other than end-of-stream
    #[error("input error: {source}")]
    Read {
        /// Source name
        source_name: String,
        /// Underlying failure
        #[source]
        source: ContractError,
    },

    /// The Relay dropped its receiver before input was exhausted
    #[error("relay closed while reading from '{source_name}'")]
    ChannelClosed {
        /// Source name
        source_name: String,
    },
}

/// Ingestion Result alias
pub type Result<T> = std::result::Result<T, IngestionError>;
