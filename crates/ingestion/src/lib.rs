//! # Ingestion
//!
//! Reader stage of the delay pipeline.
//!
//! Responsibilities:
//! - Pull fixed-size chunks from a `ByteSource`
//! - Stamp each chunk with its arrival instant
//! - Hand chunks to the Relay over an async-channel, closing it on end-of-stream
//!
//! ## Usage Example
//!
//! ```ignore
//! use ingestion::{Reader, ReaderSource};
//!
//! let (tx, rx) = async_channel::bounded(1);
//! let reader = Reader::new(ReaderSource::stdin(), 1024, tx);
//! tokio::spawn(reader.run());
//! while let Ok(chunk) = rx.recv().await {
//!     // forward chunk
//! }
//! ```
//!
//! ## Mock Testing
//!
//! ```ignore
//! use ingestion::MockByteSource;
//!
//! let source = MockByteSource::new("script")
//!     .chunk("ab")
//!     .pause(Duration::from_millis(10))
//!     .chunk("cd");
//! ```

mod error;
mod metrics;
mod mock;
mod reader;
mod source;

// Re-exports
pub use contracts::{ByteSource, TimedChunk};
pub use error::{IngestionError, Result};
pub use metrics::{IngestionMetrics, MetricsSnapshot};
pub use mock::{MockByteSource, MockStep};
pub use reader::Reader;
pub use source::ReaderSource;
