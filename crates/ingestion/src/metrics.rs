//! Reader counters

use std::sync::atomic::{AtomicU64, Ordering};

/// Ingestion metrics, shared with whoever holds the `Arc`
#[derive(Debug, Default)]
pub struct IngestionMetrics {
    /// Chunks handed to the Relay
    pub chunks_read: AtomicU64,

    /// Payload bytes handed to the Relay
    pub bytes_read: AtomicU64,
}

impl IngestionMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one chunk of `bytes` bytes
    pub fn record_chunk(&self, bytes: usize) {
        self.chunks_read.fetch_add(1, Ordering::Relaxed);
        self.bytes_read.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    /// Get snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            chunks_read: self.chunks_read.load(Ordering::Relaxed),
            bytes_read: self.bytes_read.load(Ordering::Relaxed),
        }
    }
}

/// Metrics snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub chunks_read: u64,
    pub bytes_read: u64,
}
