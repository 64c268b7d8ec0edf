//! MemorySink - records writes in memory
//!
//! Used by tests to observe what was released and when, and to inject
//! failures, short writes and slow writes.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use bytes::Bytes;
use contracts::{ByteSink, ContractError};
use tokio::time::Instant;
use tracing::debug;

/// One accepted write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedWrite {
    /// When the write started
    pub at: Instant,
    /// Bytes accepted
    pub bytes: Bytes,
}

#[derive(Debug, Default)]
struct MemoryState {
    writes: Vec<RecordedWrite>,
    closed: bool,
}

/// Shared view of what a MemorySink received
#[derive(Debug, Clone, Default)]
pub struct MemorySinkHandle {
    state: Arc<Mutex<MemoryState>>,
}

impl MemorySinkHandle {
    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        // A poisoned lock only means a test panicked mid-write
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// All accepted writes, in order
    pub fn writes(&self) -> Vec<RecordedWrite> {
        self.lock().writes.clone()
    }

    /// Concatenation of every accepted write
    pub fn contents(&self) -> Vec<u8> {
        self.lock()
            .writes
            .iter()
            .flat_map(|w| w.bytes.iter().copied())
            .collect()
    }

    pub fn write_count(&self) -> usize {
        self.lock().writes.len()
    }

    /// True once the sink was closed after a clean drain
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }
}

/// In-memory `ByteSink`
pub struct MemorySink {
    name: String,
    handle: MemorySinkHandle,
    attempts: usize,
    fail_on_write: Option<usize>,
    accept_at_most: Option<usize>,
    write_latency: Duration,
}

impl MemorySink {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handle: MemorySinkHandle::default(),
            attempts: 0,
            fail_on_write: None,
            accept_at_most: None,
            write_latency: Duration::ZERO,
        }
    }

    /// Fail the n-th write (1-based) and every write after it
    pub fn fail_on_write(mut self, n: usize) -> Self {
        self.fail_on_write = Some(n);
        self
    }

    /// Accept at most `max` bytes per write
    pub fn short_writes(mut self, max: usize) -> Self {
        self.accept_at_most = Some(max);
        self
    }

    /// Sleep this long inside every write
    pub fn write_latency(mut self, latency: Duration) -> Self {
        self.write_latency = latency;
        self
    }

    /// Handle for inspecting writes after the sink is moved
    pub fn handle(&self) -> MemorySinkHandle {
        self.handle.clone()
    }
}

impl ByteSink for MemorySink {
    fn name(&self) -> &str {
        &self.name
    }

    async fn write(&mut self, bytes: &[u8]) -> Result<usize, ContractError> {
        self.attempts += 1;
        if self.fail_on_write.is_some_and(|n| self.attempts >= n) {
            return Err(ContractError::sink_write(&self.name, "injected failure"));
        }

        let at = Instant::now();
        if !self.write_latency.is_zero() {
            tokio::time::sleep(self.write_latency).await;
        }

        let n = self
            .accept_at_most
            .map_or(bytes.len(), |max| max.min(bytes.len()));
        self.handle.lock().writes.push(RecordedWrite {
            at,
            bytes: Bytes::copy_from_slice(&bytes[..n]),
        });
        Ok(n)
    }

    async fn flush(&mut self) -> Result<(), ContractError> {
        Ok(())
    }

    async fn close(&mut self) -> Result<(), ContractError> {
        self.handle.lock().closed = true;
        debug!(sink = %self.name, "MemorySink closed");
        Ok(())
    }
}
