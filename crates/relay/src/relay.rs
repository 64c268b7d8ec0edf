//! Relay - main forwarding loop

use std::collections::VecDeque;

use async_channel::Receiver;
use contracts::TimedChunk;
use observability::Stage;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, trace};

use crate::error::RelayError;

/// Summary of a finished relay run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayReport {
    /// Chunks passed downstream
    pub forwarded: u64,
    /// Largest queue length observed
    pub max_depth: usize,
}

/// Relay stage
///
/// Owns a private FIFO. Each loop iteration waits on two events at once:
/// a new chunk from upstream, or a free slot downstream while the queue is
/// non-empty. Upstream is therefore only held up during the single-slot
/// handoff, never by a slow Scheduler.
pub struct Relay {
    input: Receiver<TimedChunk>,
    output: mpsc::Sender<TimedChunk>,
    queue: VecDeque<TimedChunk>,
}

impl Relay {
    /// Create a Relay between the Reader handoff and the Scheduler handoff
    pub fn new(input: Receiver<TimedChunk>, output: mpsc::Sender<TimedChunk>) -> Self {
        Self {
            input,
            output,
            queue: VecDeque::new(),
        }
    }

    /// Run until upstream is closed and every queued chunk is forwarded
    ///
    /// Returning drops the downstream sender, which signals end-of-stream
    /// to the Scheduler.
    ///
    /// # Errors
    /// `DownstreamClosed` if the Scheduler's receiver is gone while chunks
    /// are pending.
    #[instrument(name = "relay_run", skip(self))]
    pub async fn run(mut self) -> Result<RelayReport, RelayError> {
        debug!("relay started");
        let mut report = RelayReport::default();
        let mut upstream_open = true;

        while upstream_open || !self.queue.is_empty() {
            tokio::select! {
                received = self.input.recv(), if upstream_open => match received {
                    Ok(chunk) => {
                        self.queue.push_back(chunk);
                        report.max_depth = report.max_depth.max(self.queue.len());
                        observability::record_queue_depth(Stage::Relay, self.queue.len());
                        trace!(depth = self.queue.len(), "chunk queued");
                    }
                    Err(_) => {
                        debug!(pending = self.queue.len(), "upstream closed");
                        upstream_open = false;
                    }
                },
                permit = self.output.reserve(), if !self.queue.is_empty() => match permit {
                    Ok(permit) => {
                        if let Some(chunk) = self.queue.pop_front() {
                            permit.send(chunk);
                            report.forwarded += 1;
                            observability::record_queue_depth(Stage::Relay, self.queue.len());
                        }
                    }
                    Err(_) => {
                        return Err(RelayError::DownstreamClosed {
                            pending: self.queue.len(),
                        });
                    }
                },
            }
        }

        info!(
            forwarded = report.forwarded,
            max_depth = report.max_depth,
            "relay drained"
        );
        Ok(report)
    }
}
