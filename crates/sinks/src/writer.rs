//! WriterSink - ByteSink over any tokio writer

use std::path::Path;
use std::sync::Arc;

use contracts::{ByteSink, ContractError};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, instrument, warn};

use crate::metrics::SinkMetrics;

/// Adapts an `AsyncWrite` to `ByteSink`
///
/// Each `write` keeps calling the writer until the whole buffer is accepted
/// or the writer takes zero bytes, then flushes so the chunk leaves at its
/// release instant. A zero-byte acceptance surfaces as a short count.
pub struct WriterSink<W> {
    name: String,
    inner: W,
    metrics: Arc<SinkMetrics>,
}

impl<W> WriterSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(name: impl Into<String>, inner: W) -> Self {
        Self {
            name: name.into(),
            inner,
            metrics: Arc::new(SinkMetrics::new()),
        }
    }

    /// Get current metrics
    pub fn metrics(&self) -> &Arc<SinkMetrics> {
        &self.metrics
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    fn write_error(&self, e: std::io::Error) -> ContractError {
        self.metrics.inc_failure_count();
        ContractError::sink_write(&self.name, e.to_string())
    }
}

impl WriterSink<tokio::io::Stdout> {
    /// Standard output
    pub fn stdout() -> Self {
        Self::new("stdout", tokio::io::stdout())
    }
}

impl WriterSink<tokio::fs::File> {
    /// Create (or truncate) a file for writing
    pub async fn create(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let file = tokio::fs::File::create(path).await?;
        Ok(Self::new(path.display().to_string(), file))
    }
}

impl<W> ByteSink for WriterSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn write(&mut self, bytes: &[u8]) -> Result<usize, ContractError> {
        let mut written = 0;
        while written < bytes.len() {
            match self.inner.write(&bytes[written..]).await {
                Ok(0) => {
                    warn!(sink = %self.name, written, expected = bytes.len(), "writer accepted no bytes");
                    break;
                }
                Ok(n) => written += n,
                Err(e) => return Err(self.write_error(e)),
            }
        }
        if let Err(e) = self.inner.flush().await {
            return Err(self.write_error(e));
        }

        self.metrics.record_write(written);
        Ok(written)
    }

    #[instrument(name = "writer_sink_flush", skip(self), fields(sink = %self.name))]
    async fn flush(&mut self) -> Result<(), ContractError> {
        self.inner.flush().await?;
        Ok(())
    }

    #[instrument(name = "writer_sink_close", skip(self), fields(sink = %self.name))]
    async fn close(&mut self) -> Result<(), ContractError> {
        self.inner.shutdown().await?;
        debug!(sink = %self.name, "WriterSink closed");
        Ok(())
    }
}
