//! Reader stage

use std::sync::Arc;

use async_channel::Sender;
use bytes::Bytes;
use contracts::{ByteSource, TimedChunk};
use tracing::{debug, error, info, instrument, trace};

use crate::error::{IngestionError, Result};
use crate::metrics::{IngestionMetrics, MetricsSnapshot};

/// Reader stage
///
/// Reads up to `chunk_size` bytes at a time, stamps each non-empty read with
/// the current instant and hands it to the Relay. At most one chunk is in
/// flight between the read call and the handoff.
pub struct Reader<S> {
    source: S,
    chunk_size: usize,
    tx: Sender<TimedChunk>,
    metrics: Arc<IngestionMetrics>,
}

impl<S: ByteSource> Reader<S> {
    /// Create a Reader feeding `tx`
    ///
    /// # Arguments
    /// * `source` - Input source
    /// * `chunk_size` - Maximum bytes per read (must be non-zero)
    /// * `tx` - Handoff to the Relay
    pub fn new(source: S, chunk_size: usize, tx: Sender<TimedChunk>) -> Self {
        debug_assert!(chunk_size > 0, "chunk_size must be non-zero");
        Self {
            source,
            chunk_size,
            tx,
            metrics: Arc::new(IngestionMetrics::new()),
        }
    }

    /// Use a shared metrics instance
    pub fn with_metrics(mut self, metrics: Arc<IngestionMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Get metrics reference
    pub fn metrics(&self) -> Arc<IngestionMetrics> {
        self.metrics.clone()
    }

    /// Read until end-of-stream
    ///
    /// Closes the handoff channel on return, whether or not it succeeded.
    ///
    /// # Errors
    /// - `Read` on any source failure (no retry)
    /// - `ChannelClosed` if the Relay went away first
    #[instrument(name = "reader_run", skip(self), fields(source = %self.source.name()))]
    pub async fn run(mut self) -> Result<MetricsSnapshot> {
        debug!(chunk_size = self.chunk_size, "reader started");
        let mut buf = vec![0u8; self.chunk_size];

        loop {
            let n = match self.source.read(&mut buf).await {
                Ok(0) => break,
                Ok(n) => n,
                Err(source) => {
                    error!(error = %source, "read failed");
                    return Err(IngestionError::Read {
                        source_name: self.source.name().to_string(),
                        source,
                    });
                }
            };

            let chunk = TimedChunk::stamped(Bytes::copy_from_slice(&buf[..n]));
            self.metrics.record_chunk(n);
            observability::record_chunk_read(n);
            trace!(bytes = n, "chunk read");

            if self.tx.send(chunk).await.is_err() {
                return Err(IngestionError::ChannelClosed {
                    source_name: self.source.name().to_string(),
                });
            }
        }

        self.tx.close();
        let snapshot = self.metrics.snapshot();
        info!(
            chunks = snapshot.chunks_read,
            bytes = snapshot.bytes_read,
            "input exhausted"
        );
        Ok(snapshot)
    }
}
