//! Pipeline metrics
//!
//! Prometheus recorders for each stage plus an in-memory running statistic
//! used for end-of-run summaries. Without an installed recorder the
//! `metrics` macros are no-ops.

use metrics::{counter, gauge, histogram};

/// Pipeline stage label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Reader,
    Relay,
    Scheduler,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Reader => "reader",
            Stage::Relay => "relay",
            Stage::Scheduler => "scheduler",
        }
    }
}

/// Record a chunk accepted from the input source
pub fn record_chunk_read(bytes: usize) {
    counter!("delay_chunks_read_total").increment(1);
    counter!("delay_bytes_read_total").increment(bytes as u64);
}

/// Record a chunk written to the sink
///
/// `lateness_ms` is how far past its release instant the write happened.
pub fn record_chunk_released(bytes: usize, lateness_ms: f64) {
    counter!("delay_chunks_released_total").increment(1);
    counter!("delay_bytes_released_total").increment(bytes as u64);
    histogram!("delay_release_lateness_ms").record(lateness_ms);
}

/// Record the number of chunks queued inside a stage
pub fn record_queue_depth(stage: Stage, depth: usize) {
    gauge!("delay_queue_depth", "stage" => stage.as_str()).set(depth as f64);
}

/// Statistics summary
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// Add a sample
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn summary(&self) -> StatsSummary {
        StatsSummary::from(self)
    }
}
