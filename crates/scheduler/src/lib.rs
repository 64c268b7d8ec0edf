//! # Scheduler
//!
//! Delay queue: the last stage of the pipeline.
//!
//! Responsibilities:
//! - Hold chunks until `arrival + delay`
//! - Write them to the sink in arrival order
//! - Fail fast on write errors and short writes
//!
//! Arrival stamps never decrease, so the queue is already sorted by release
//! instant. One timer armed for the head replaces a priority queue.
//!
//! ## Usage Example
//!
//! ```ignore
//! use scheduler::Scheduler;
//!
//! let (tx, rx) = tokio::sync::mpsc::channel(1);
//! let report = Scheduler::new(Duration::from_millis(100), rx, sink).run().await?;
//! println!("released {} chunks", report.released);
//! ```

mod error;
mod scheduler;

pub use error::SchedulerError;
pub use scheduler::{Scheduler, SchedulerReport};
