//! # Pipeline
//!
//! Wires Reader → Relay → Scheduler → sink and runs them as three tasks.
//!
//! ## Usage Example
//!
//! ```ignore
//! use pipeline::Pipeline;
//!
//! let stats = Pipeline::new(settings)
//!     .run(ReaderSource::stdin(), WriterSink::stdout())
//!     .await?;
//! ```

mod error;
mod orchestrator;
mod stats;

pub use error::PipelineError;
pub use orchestrator::{Pipeline, HANDOFF_CAPACITY};
pub use stats::PipelineStats;
