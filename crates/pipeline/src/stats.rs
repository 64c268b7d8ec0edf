//! Pipeline statistics.

use std::fmt;
use std::time::Duration;

use observability::RunningStats;

/// Statistics from a pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    /// Chunks read from the source
    pub chunks_read: u64,

    /// Bytes read from the source
    pub bytes_read: u64,

    /// Chunks passed through the relay
    pub chunks_forwarded: u64,

    /// Chunks written to the sink
    pub chunks_released: u64,

    /// Bytes written to the sink
    pub bytes_released: u64,

    /// Largest relay queue length
    pub relay_max_depth: usize,

    /// Largest scheduler queue length
    pub scheduler_max_depth: usize,

    /// Release lateness in milliseconds
    pub lateness_ms: RunningStats,

    /// Total duration of the run
    pub duration: Duration,
}

impl PipelineStats {
    /// Bytes per second written to the sink
    pub fn throughput(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.bytes_released as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// True when every byte read was also written
    pub fn is_fully_drained(&self) -> bool {
        self.chunks_read == self.chunks_released && self.bytes_read == self.bytes_released
    }
}

impl fmt::Display for PipelineStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Delay Pipeline Summary ===")?;
        writeln!(f, "Duration: {:.3}s", self.duration.as_secs_f64())?;
        writeln!(
            f,
            "Read: {} chunks / {} bytes",
            self.chunks_read, self.bytes_read
        )?;
        writeln!(
            f,
            "Released: {} chunks / {} bytes",
            self.chunks_released, self.bytes_released
        )?;
        writeln!(
            f,
            "Queue depth (max): relay={}, scheduler={}",
            self.relay_max_depth, self.scheduler_max_depth
        )?;
        write!(f, "Lateness (ms): {}", self.lateness_ms.summary())
    }
}
