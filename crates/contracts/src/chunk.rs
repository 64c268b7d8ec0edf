//! TimedChunk - the unit handed between stages
//!
//! A span of input bytes plus the instant it was read.

use std::time::Duration;

use bytes::Bytes;
use tokio::time::Instant;

/// Bytes read by one input operation, stamped with their arrival time.
///
/// Fields are private: a chunk is never modified after the Reader builds it.
/// It is moved from stage to stage and consumed when written.
#[derive(Debug, PartialEq, Eq)]
pub struct TimedChunk {
    payload: Bytes,
    arrival: Instant,
}

impl TimedChunk {
    /// Create a chunk with an explicit arrival instant
    pub fn new(payload: impl Into<Bytes>, arrival: Instant) -> Self {
        Self {
            payload: payload.into(),
            arrival,
        }
    }

    /// Create a chunk stamped with the current time
    pub fn stamped(payload: impl Into<Bytes>) -> Self {
        Self::new(payload, Instant::now())
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    pub fn into_payload(self) -> Bytes {
        self.payload
    }

    pub fn arrival(&self) -> Instant {
        self.arrival
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Instant at which the chunk is due: `arrival + delay`
    #[inline]
    pub fn release_at(&self, delay: Duration) -> Instant {
        self.arrival + delay
    }

    /// Time left until release, measured from `now`.
    ///
    /// Clamped at zero, so an overdue chunk is released immediately.
    #[inline]
    pub fn remaining(&self, delay: Duration, now: Instant) -> Duration {
        self.release_at(delay).saturating_duration_since(now)
    }
}
