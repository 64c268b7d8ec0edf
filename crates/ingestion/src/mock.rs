//! Mock byte source
//!
//! Replays a script of chunks, pauses and failures, for tests without real I/O.

use std::collections::VecDeque;
use std::time::Duration;

use bytes::Bytes;
use contracts::{ByteSource, ContractError};
use tracing::trace;

/// One scripted step
#[derive(Debug, Clone)]
pub enum MockStep {
    /// Deliver these bytes (split across reads if larger than the buffer)
    Chunk(Bytes),
    /// Sleep before the next step
    Pause(Duration),
    /// Fail the current read
    Fail(String),
}

/// Scripted `ByteSource`; reports end-of-stream once the script is exhausted
#[derive(Debug, Clone)]
pub struct MockByteSource {
    name: String,
    steps: VecDeque<MockStep>,
}

impl MockByteSource {
    /// Create an empty script (immediate end-of-stream)
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: VecDeque::new(),
        }
    }

    /// Build a source delivering each item as one chunk, back to back
    pub fn from_chunks<I, B>(name: impl Into<String>, chunks: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
    {
        chunks
            .into_iter()
            .fold(Self::new(name), |source, chunk| source.chunk(chunk))
    }

    pub fn chunk(mut self, bytes: impl Into<Bytes>) -> Self {
        self.steps.push_back(MockStep::Chunk(bytes.into()));
        self
    }

    pub fn pause(mut self, duration: Duration) -> Self {
        self.steps.push_back(MockStep::Pause(duration));
        self
    }

    pub fn fail(mut self, message: impl Into<String>) -> Self {
        self.steps.push_back(MockStep::Fail(message.into()));
        self
    }

    /// Steps not yet consumed
    pub fn remaining_steps(&self) -> usize {
        self.steps.len()
    }
}

impl ByteSource for MockByteSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, ContractError> {
        loop {
            match self.steps.pop_front() {
                None => return Ok(0),
                Some(MockStep::Pause(duration)) => {
                    trace!(source = %self.name, ?duration, "mock source pausing");
                    tokio::time::sleep(duration).await;
                }
                // An empty read would be taken as end-of-stream
                Some(MockStep::Chunk(bytes)) if bytes.is_empty() => {}
                Some(MockStep::Chunk(mut bytes)) => {
                    let n = bytes.len().min(buf.len());
                    buf[..n].copy_from_slice(&bytes[..n]);
                    if n < bytes.len() {
                        self.steps.push_front(MockStep::Chunk(bytes.split_off(n)));
                    }
                    return Ok(n);
                }
                Some(MockStep::Fail(message)) => {
                    return Err(ContractError::read(&self.name, message));
                }
            }
        }
    }
}
