//! Pipeline orchestrator - coordinates the three stages.

use contracts::{ByteSink, ByteSource, DelaySettings};
use ingestion::{MetricsSnapshot, Reader};
use relay::{Relay, RelayReport};
use scheduler::{Scheduler, SchedulerReport};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, error, info, instrument, warn};

use crate::{PipelineError, PipelineStats};

/// Slots in each inter-stage handoff
///
/// Tokio channels cannot be zero-sized, so one slot is the closest thing to a
/// rendezvous. The real queues live inside the Relay and the Scheduler.
pub const HANDOFF_CAPACITY: usize = 1;

/// What a stage hands back when it finishes cleanly
enum StageOutcome {
    Reader(MetricsSnapshot),
    Relay(RelayReport),
    Scheduler(SchedulerReport),
}

/// Main pipeline orchestrator
pub struct Pipeline {
    settings: DelaySettings,
}

impl Pipeline {
    /// Create a new pipeline with the given settings
    pub fn new(settings: DelaySettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &DelaySettings {
        &self.settings
    }

    /// Run the pipeline until the source is exhausted and every chunk is written
    ///
    /// The first stage to fail aborts the other two; chunks still queued are
    /// discarded.
    ///
    /// # Errors
    /// - `Config` if the settings are invalid (nothing is read or written)
    /// - `Reader`, `Relay`, `Scheduler` for the stage that failed first
    /// - `StagePanicked` if a stage task panicked
    #[instrument(
        name = "pipeline_run",
        skip_all,
        fields(
            delay_ms = self.settings.delay.as_millis() as u64,
            chunk_size = self.settings.chunk_size
        )
    )]
    pub async fn run<S, K>(self, source: S, sink: K) -> Result<PipelineStats, PipelineError>
    where
        S: ByteSource + 'static,
        K: ByteSink + 'static,
    {
        self.settings.validate()?;
        let start_time = Instant::now();

        let (reader_tx, reader_rx) = async_channel::bounded(HANDOFF_CAPACITY);
        let (relay_tx, relay_rx) = mpsc::channel(HANDOFF_CAPACITY);

        let reader = Reader::new(source, self.settings.chunk_size, reader_tx);
        let relay = Relay::new(reader_rx, relay_tx);
        let scheduler = Scheduler::new(self.settings.delay, relay_rx, sink);

        let mut stages = JoinSet::new();
        stages.spawn(async move {
            reader
                .run()
                .await
                .map(StageOutcome::Reader)
                .map_err(PipelineError::from)
        });
        stages.spawn(async move {
            relay
                .run()
                .await
                .map(StageOutcome::Relay)
                .map_err(PipelineError::from)
        });
        stages.spawn(async move {
            scheduler
                .run()
                .await
                .map(StageOutcome::Scheduler)
                .map_err(PipelineError::from)
        });
        info!("Pipeline started");

        let mut stats = PipelineStats::default();
        let mut secondary: Option<PipelineError> = None;

        while let Some(joined) = stages.join_next().await {
            let outcome = match joined {
                Ok(Ok(outcome)) => outcome,
                Ok(Err(e)) if e.is_secondary() => {
                    // The neighbour that stopped first has the real cause
                    debug!(error = %e, "stage stopped after a neighbour");
                    secondary.get_or_insert(e);
                    continue;
                }
                Ok(Err(e)) => {
                    error!(error = %e, "Stage failed, aborting pipeline");
                    stages.abort_all();
                    return Err(e);
                }
                Err(join_error) => {
                    error!(error = %join_error, "Stage task panicked, aborting pipeline");
                    stages.abort_all();
                    return Err(PipelineError::StagePanicked {
                        message: join_error.to_string(),
                    });
                }
            };

            match outcome {
                StageOutcome::Reader(snapshot) => {
                    stats.chunks_read = snapshot.chunks_read;
                    stats.bytes_read = snapshot.bytes_read;
                }
                StageOutcome::Relay(report) => {
                    stats.chunks_forwarded = report.forwarded;
                    stats.relay_max_depth = report.max_depth;
                }
                StageOutcome::Scheduler(report) => {
                    stats.chunks_released = report.released;
                    stats.bytes_released = report.bytes;
                    stats.scheduler_max_depth = report.max_depth;
                    stats.lateness_ms = report.lateness_ms;
                }
            }
        }

        if let Some(e) = secondary {
            warn!(error = %e, "Pipeline stopped without a primary error");
            return Err(e);
        }

        stats.duration = start_time.elapsed();
        info!(
            chunks = stats.chunks_released,
            bytes = stats.bytes_released,
            duration_secs = stats.duration.as_secs_f64(),
            "Pipeline drained"
        );
        Ok(stats)
    }
}
