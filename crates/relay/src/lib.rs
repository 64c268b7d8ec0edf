//! # Relay
//!
//! Decoupling stage between the Reader and the Scheduler.
//!
//! Responsibilities:
//! - Accept every chunk the Reader produces, even while the Scheduler is busy writing
//! - Forward chunks in arrival order, never dropping or duplicating
//! - Close the Scheduler's input once the Reader is done and the queue is empty

mod error;
mod relay;

pub use error::RelayError;
pub use relay::{Relay, RelayReport};
