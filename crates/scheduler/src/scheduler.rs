//! Scheduler - timer-driven release loop

use std::collections::VecDeque;
use std::time::Duration;

use contracts::{ByteSink, TimedChunk};
use observability::{RunningStats, Stage};
use tokio::sync::mpsc;
use tokio::time::{sleep, Instant};
use tracing::{debug, error, info, instrument, trace};

use crate::error::SchedulerError;

/// Summary of a finished scheduler run
#[derive(Debug, Clone, Default)]
pub struct SchedulerReport {
    /// Chunks written to the sink
    pub released: u64,
    /// Payload bytes written to the sink
    pub bytes: u64,
    /// Largest queue length observed
    pub max_depth: usize,
    /// How far past its release instant each chunk was written, in ms
    pub lateness_ms: RunningStats,
}

/// Scheduler (delay queue) stage
///
/// Waits on three events: a chunk from the Relay, the Relay closing, and the
/// head timer firing. The timer is a single `Sleep` re-armed with `reset()`;
/// it is armed exactly when the queue is non-empty.
pub struct Scheduler<K> {
    delay: Duration,
    input: mpsc::Receiver<TimedChunk>,
    sink: K,
    queue: VecDeque<TimedChunk>,
}

impl<K: ByteSink> Scheduler<K> {
    /// Create a Scheduler releasing chunks `delay` after their arrival
    pub fn new(delay: Duration, input: mpsc::Receiver<TimedChunk>, sink: K) -> Self {
        Self {
            delay,
            input,
            sink,
            queue: VecDeque::new(),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run until the Relay closes and every queued chunk is written
    ///
    /// On success the sink is flushed and closed.
    ///
    /// # Errors
    /// - `Write` if the sink fails
    /// - `ShortWrite` if the sink accepts fewer bytes than supplied
    /// - `Close` if the final flush/close fails
    ///
    /// Chunks still queued when an error occurs are never written.
    #[instrument(
        name = "scheduler_run",
        skip(self),
        fields(sink = %self.sink.name(), delay_ms = self.delay.as_millis() as u64)
    )]
    pub async fn run(mut self) -> Result<SchedulerReport, SchedulerError> {
        debug!("scheduler started");
        let mut report = SchedulerReport::default();
        let mut upstream_open = true;

        let timer = sleep(Duration::ZERO);
        tokio::pin!(timer);
        let mut armed = false;

        while upstream_open || !self.queue.is_empty() {
            tokio::select! {
                received = self.input.recv(), if upstream_open => match received {
                    Some(chunk) => {
                        self.queue.push_back(chunk);
                        report.max_depth = report.max_depth.max(self.queue.len());
                        observability::record_queue_depth(Stage::Scheduler, self.queue.len());

                        if !armed {
                            if let Some(deadline) = self.head_deadline() {
                                timer.as_mut().reset(deadline);
                                armed = true;
                            }
                        }
                    }
                    None => {
                        debug!(pending = self.queue.len(), "relay closed, draining");
                        upstream_open = false;
                    }
                },
                () = &mut timer, if armed => {
                    armed = false;
                    if let Some(chunk) = self.queue.pop_front() {
                        self.release(chunk, &mut report).await?;
                    }
                    if let Some(deadline) = self.head_deadline() {
                        timer.as_mut().reset(deadline);
                        armed = true;
                    }
                }
            }
        }

        self.finish().await?;
        info!(
            released = report.released,
            bytes = report.bytes,
            max_depth = report.max_depth,
            lateness_ms = %report.lateness_ms.summary(),
            "scheduler drained"
        );
        Ok(report)
    }

    /// Deadline for the current head: `now + max(0, arrival + delay - now)`
    fn head_deadline(&self) -> Option<Instant> {
        let now = Instant::now();
        self.queue
            .front()
            .map(|head| now + head.remaining(self.delay, now))
    }

    async fn release(
        &mut self,
        chunk: TimedChunk,
        report: &mut SchedulerReport,
    ) -> Result<(), SchedulerError> {
        let expected = chunk.len();
        let lateness = Instant::now().saturating_duration_since(chunk.release_at(self.delay));
        let lateness_ms = lateness.as_secs_f64() * 1000.0;

        let written = self.sink.write(chunk.payload()).await.map_err(|source| {
            error!(error = %source, "write failed");
            SchedulerError::Write {
                sink_name: self.sink.name().to_string(),
                source,
            }
        })?;
        if written != expected {
            error!(written, expected, "short write");
            return Err(SchedulerError::ShortWrite {
                sink_name: self.sink.name().to_string(),
                written,
                expected,
            });
        }

        report.released += 1;
        report.bytes += expected as u64;
        report.lateness_ms.push(lateness_ms);
        observability::record_chunk_released(expected, lateness_ms);
        observability::record_queue_depth(Stage::Scheduler, self.queue.len());
        trace!(bytes = expected, lateness_ms, "chunk released");
        Ok(())
    }

    async fn finish(&mut self) -> Result<(), SchedulerError> {
        let sink_name = self.sink.name().to_string();
        if let Err(source) = self.sink.flush().await {
            return Err(SchedulerError::Close { sink_name, source });
        }
        self.sink
            .close()
            .await
            .map_err(|source| SchedulerError::Close { sink_name, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::ContractError;
    use std::sync::{Arc, Mutex};

    type Writes = Arc<Mutex<Vec<(Instant, Vec<u8>)>>>;

    /// Mock sink for testing
    #[derive(Default)]
    struct RecordingSink {
        writes: Writes,
        fail_on: Option<usize>,
        accept_at_most: Option<usize>,
        closed: Arc<Mutex<bool>>,
    }

    impl ByteSink for RecordingSink {
        fn name(&self) -> &str {
            "recording"
        }

        async fn write(&mut self, bytes: &[u8]) -> Result<usize, ContractError> {
            let mut writes = self.writes.lock().unwrap();
            if self.fail_on == Some(writes.len() + 1) {
                return Err(ContractError::sink_write("recording", "mock failure"));
            }
            let n = self.accept_at_most.map_or(bytes.len(), |max| max.min(bytes.len()));
            writes.push((Instant::now(), bytes[..n].to_vec()));
            Ok(n)
        }

        async fn flush(&mut self) -> Result<(), ContractError> {
            Ok(())
        }

        async fn close(&mut self) -> Result<(), ContractError> {
            *self.closed.lock().unwrap() = true;
            Ok(())
        }
    }

    fn payloads(writes: &Writes) -> Vec<Vec<u8>> {
        writes
            .lock()
            .unwrap()
            .iter()
            .map(|(_, bytes)| bytes.clone())
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_release_waits_for_delay() {
        let delay = Duration::from_millis(100);
        let (tx, rx) = mpsc::channel(1);
        let sink = RecordingSink::default();
        let writes = sink.writes.clone();
        let closed = sink.closed.clone();
        let handle = tokio::spawn(Scheduler::new(delay, rx, sink).run());

        let arrival = Instant::now();
        tx.send(TimedChunk::new("hello world", arrival)).await.unwrap();
        drop(tx);

        let report = handle.await.unwrap().unwrap();
        let writes = writes.lock().unwrap();
        assert_eq!(writes.len(), 1);
        assert!(writes[0].0 >= arrival + delay);
        assert!(writes[0].0 < arrival + delay + Duration::from_millis(5));
        assert_eq!(writes[0].1, b"hello world");
        assert_eq!(report.released, 1);
        assert_eq!(report.bytes, 11);
        assert!(*closed.lock().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_head_timer_rearms_per_chunk() {
        let delay = Duration::from_millis(100);
        let (tx, rx) = mpsc::channel(1);
        let sink = RecordingSink::default();
        let writes = sink.writes.clone();
        let handle = tokio::spawn(Scheduler::new(delay, rx, sink).run());

        let start = Instant::now();
        tx.send(TimedChunk::new("a", start)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        tx.send(TimedChunk::stamped("b")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;
        tx.send(TimedChunk::stamped("c")).await.unwrap();
        drop(tx);

        handle.await.unwrap().unwrap();
        let writes = writes.lock().unwrap();
        let offsets: Vec<Duration> = writes.iter().map(|(at, _)| *at - start).collect();
        assert_eq!(
            offsets,
            vec![
                Duration::from_millis(100),
                Duration::from_millis(130),
                Duration::from_millis(170),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_overdue_chunk_released_immediately() {
        let (tx, rx) = mpsc::channel(1);
        let sink = RecordingSink::default();
        let writes = sink.writes.clone();

        let arrival = Instant::now();
        tokio::time::advance(Duration::from_secs(1)).await;
        let fed_at = Instant::now();

        let handle = tokio::spawn(Scheduler::new(Duration::from_millis(100), rx, sink).run());
        tx.send(TimedChunk::new("late", arrival)).await.unwrap();
        drop(tx);

        let report = handle.await.unwrap().unwrap();
        assert_eq!(writes.lock().unwrap()[0].0, fed_at);
        assert!(report.lateness_ms.max() >= 900.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_delay_releases_on_receipt() {
        let (tx, rx) = mpsc::channel(1);
        let sink = RecordingSink::default();
        let writes = sink.writes.clone();
        let handle = tokio::spawn(Scheduler::new(Duration::ZERO, rx, sink).run());

        let start = Instant::now();
        for payload in ["x", "y", "z"] {
            tx.send(TimedChunk::stamped(payload)).await.unwrap();
        }
        drop(tx);

        handle.await.unwrap().unwrap();
        let writes = writes.lock().unwrap();
        assert_eq!(writes.len(), 3);
        assert!(writes.iter().all(|(at, _)| *at == start));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drain_after_upstream_closed() {
        let (tx, rx) = mpsc::channel(8);
        let sink = RecordingSink::default();
        let writes = sink.writes.clone();

        for payload in ["1", "2", "3", "4"] {
            tx.send(TimedChunk::stamped(payload)).await.unwrap();
        }
        drop(tx);

        let report = Scheduler::new(Duration::from_secs(3), rx, sink)
            .run()
            .await
            .unwrap();
        assert_eq!(report.released, 4);
        assert_eq!(
            payloads(&writes),
            vec![b"1".to_vec(), b"2".to_vec(), b"3".to_vec(), b"4".to_vec()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_write_failure_aborts() {
        let (tx, rx) = mpsc::channel(8);
        let sink = RecordingSink {
            fail_on: Some(2),
            ..Default::default()
        };
        let writes = sink.writes.clone();
        let closed = sink.closed.clone();

        tx.send(TimedChunk::stamped("ab")).await.unwrap();
        tx.send(TimedChunk::stamped("cd")).await.unwrap();
        drop(tx);

        let result = Scheduler::new(Duration::from_millis(10), rx, sink).run().await;
        assert!(matches!(result, Err(SchedulerError::Write { .. })));
        assert_eq!(payloads(&writes), vec![b"ab".to_vec()]);
        assert!(!*closed.lock().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_write_is_fatal() {
        let (tx, rx) = mpsc::channel(8);
        let sink = RecordingSink {
            accept_at_most: Some(2),
            ..Default::default()
        };

        tx.send(TimedChunk::stamped("abcd")).await.unwrap();
        drop(tx);

        let err = Scheduler::new(Duration::ZERO, rx, sink)
            .run()
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SchedulerError::ShortWrite {
                written: 2,
                expected: 4,
                ..
            }
        ));
        assert!(err.to_string().contains("2 != 4"));
    }

    #[tokio::test]
    async fn test_empty_input_finishes_cleanly() {
        let (tx, rx) = mpsc::channel::<TimedChunk>(1);
        drop(tx);

        let report = Scheduler::new(Duration::from_secs(60), rx, RecordingSink::default())
            .run()
            .await
            .unwrap();
        assert_eq!(report.released, 0);
    }
}
