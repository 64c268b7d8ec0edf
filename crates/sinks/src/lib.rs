//! # Sinks
//!
//! Output implementations for the Scheduler.
//!
//! - `WriterSink`: any tokio writer (stdout, a file)
//! - `MemorySink`: in-memory recorder with failure injection, for tests

mod memory;
mod metrics;
mod writer;

pub use contracts::ByteSink;
pub use memory::{MemorySink, MemorySinkHandle, RecordedWrite};
pub use metrics::{MetricsSnapshot, SinkMetrics};
pub use writer::WriterSink;
