//! # Contracts
//!
//! Interface contracts shared by every stage of the delay pipeline.
//! Stage crates depend on this crate only, never on each other.
//!
//! ## Time Model
//! - Arrival stamps use `tokio::time::Instant`, so tests can drive the
//!   pipeline on a paused clock
//! - Chunks arrive with non-decreasing stamps; release order equals arrival order

mod chunk;
mod error;
mod settings;
mod sink;
mod source;

pub use chunk::TimedChunk;
pub use error::*;
pub use settings::*;
pub use sink::*;
pub use source::*;
