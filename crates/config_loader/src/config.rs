//! File-level configuration model

use std::path::PathBuf;

use contracts::{ContractError, DelaySettings, DEFAULT_CHUNK_SIZE, DEFAULT_DELAY};
use serde::{Deserialize, Serialize};

use crate::duration::parse_delay;

/// Configuration as written in a TOML/JSON file
///
/// Every field is optional. The CLI layers its own overrides on top with
/// [`DelayConfig::merge`] before resolving [`DelaySettings`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DelayConfig {
    /// Hold time, duration syntax (`"250ms"`, `"1m"`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<String>,

    /// Read buffer size in bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_size: Option<usize>,

    /// Input file (stdin when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<PathBuf>,

    /// Output file (stdout when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    /// Prometheus exporter port (0 = disabled)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics_port: Option<u16>,
}

impl DelayConfig {
    /// Overlay `other` on `self`; fields set in `other` win
    pub fn merge(self, other: DelayConfig) -> DelayConfig {
        DelayConfig {
            delay: other.delay.or(self.delay),
            chunk_size: other.chunk_size.or(self.chunk_size),
            input: other.input.or(self.input),
            output: other.output.or(self.output),
            metrics_port: other.metrics_port.or(self.metrics_port),
        }
    }

    /// Resolve the pipeline settings, applying defaults for unset fields
    ///
    /// # Errors
    /// - Malformed or negative delay
    /// - Out-of-range chunk size
    pub fn settings(&self) -> Result<DelaySettings, ContractError> {
        let delay = match self.delay.as_deref() {
            Some(raw) => parse_delay(raw)?,
            None => DEFAULT_DELAY,
        };
        DelaySettings::new(delay, self.chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE))
    }

    /// Metrics port, with `0` meaning disabled
    pub fn metrics_port(&self) -> Option<u16> {
        self.metrics_port.filter(|port| *port != 0)
    }
}
