//! # Integration Tests
//!
//! End-to-end tests of the delay pipeline.
//!
//! Covers:
//! - order, timing and drain guarantees against scripted sources
//! - fatal error paths (read, write, short write)
//! - configuration resolution as the CLI performs it
//! - real file I/O through `ReaderSource` / `WriterSink`

#[cfg(test)]
mod e2e_tests {
    use std::time::Duration;

    use contracts::DelaySettings;
    use ingestion::MockByteSource;
    use pipeline::{Pipeline, PipelineError};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use scheduler::SchedulerError;
    use sinks::MemorySink;
    use tokio::time::Instant;

    fn settings(delay_ms: u64) -> DelaySettings {
        DelaySettings::with_delay(Duration::from_millis(delay_ms))
    }

    /// "hello world" with a 100ms delay is written once, no earlier than 100ms
    #[tokio::test(start_paused = true)]
    async fn test_hello_world_delayed() {
        let sink = MemorySink::new("out");
        let handle = sink.handle();
        let source = MockByteSource::from_chunks("in", ["hello world"]);

        let start = Instant::now();
        let stats = Pipeline::new(settings(100))
            .run(source, sink)
            .await
            .unwrap();

        let writes = handle.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(&writes[0].bytes[..], b"hello world");
        assert!(writes[0].at >= start + Duration::from_millis(100));
        assert!(handle.is_closed());
        assert_eq!(stats.chunks_released, 1);
    }

    /// Randomly sized chunks with random gaps come out byte-identical
    #[tokio::test(start_paused = true)]
    async fn test_order_preserved_across_arbitrary_chunking() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut source = MockByteSource::new("random");
        let mut expected = Vec::new();

        for i in 0..200u32 {
            let len = rng.random_range(1..=64);
            let chunk: Vec<u8> = (0..len).map(|j| (i as u8).wrapping_add(j as u8)).collect();
            expected.extend_from_slice(&chunk);
            source = source.chunk(chunk);
            if rng.random_bool(0.3) {
                source = source.pause(Duration::from_millis(rng.random_range(1..=5)));
            }
        }

        let sink = MemorySink::new("out");
        let handle = sink.handle();
        let settings = DelaySettings::new(Duration::from_millis(25), 16).unwrap();

        let stats = Pipeline::new(settings).run(source, sink).await.unwrap();

        assert_eq!(handle.contents(), expected);
        assert!(stats.is_fully_drained());
        assert_eq!(stats.bytes_released, expected.len() as u64);
    }

    /// No chunk is written before its arrival plus the delay
    #[tokio::test(start_paused = true)]
    async fn test_timing_lower_bound() {
        let source = MockByteSource::new("in")
            .chunk("a")
            .pause(Duration::from_millis(30))
            .chunk("b")
            .pause(Duration::from_millis(70))
            .chunk("c");
        let arrivals = [0u64, 30, 100];
        let sink = MemorySink::new("out");
        let handle = sink.handle();

        let start = Instant::now();
        Pipeline::new(settings(50)).run(source, sink).await.unwrap();

        let writes = handle.writes();
        assert_eq!(writes.len(), 3);
        for (write, arrival) in writes.iter().zip(arrivals) {
            let release = start + Duration::from_millis(arrival + 50);
            assert!(write.at >= release, "released early: {write:?}");
            assert!(write.at < release + Duration::from_millis(5), "released late: {write:?}");
        }
    }

    /// Everything still queued at end of input is written before success
    #[tokio::test(start_paused = true)]
    async fn test_drain_completeness() {
        let chunks: Vec<String> = (0..50).map(|i| format!("chunk-{i};")).collect();
        let expected = chunks.concat();
        let sink = MemorySink::new("out");
        let handle = sink.handle();

        let stats = Pipeline::new(settings(1_000))
            .run(MockByteSource::from_chunks("in", chunks), sink)
            .await
            .unwrap();

        assert_eq!(handle.contents(), expected.as_bytes());
        assert_eq!(stats.chunks_read, 50);
        assert_eq!(stats.chunks_released, 50);
        assert!(stats.duration >= Duration::from_millis(1_000));
        assert!(handle.is_closed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_delay_releases_immediately() {
        let source = MockByteSource::new("in")
            .chunk("now")
            .pause(Duration::from_millis(10))
            .chunk("later");
        let sink = MemorySink::new("out");
        let handle = sink.handle();

        let start = Instant::now();
        Pipeline::new(settings(0)).run(source, sink).await.unwrap();

        let writes = handle.writes();
        assert_eq!(writes.len(), 2);
        assert!(writes[0].at - start < Duration::from_millis(1));
        assert!(writes[1].at - start >= Duration::from_millis(10));
        assert!(writes[1].at - start < Duration::from_millis(11));
    }

    /// Sink fails on the second write: only the first chunk is emitted
    #[tokio::test(start_paused = true)]
    async fn test_fatal_write_abort() {
        let sink = MemorySink::new("out").fail_on_write(2);
        let handle = sink.handle();

        let err = Pipeline::new(settings(10))
            .run(MockByteSource::from_chunks("in", ["ab", "cd"]), sink)
            .await
            .unwrap_err();

        assert!(
            matches!(err, PipelineError::Scheduler(SchedulerError::Write { .. })),
            "{err:?}"
        );
        assert_eq!(handle.contents(), b"ab");
        assert!(!handle.is_closed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_write_is_fatal() {
        let sink = MemorySink::new("out").short_writes(1);
        let handle = sink.handle();

        let err = Pipeline::new(settings(0))
            .run(MockByteSource::from_chunks("in", ["hello"]), sink)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "scheduler: short write to 'out': 1 != 5");
        match err {
            PipelineError::Scheduler(SchedulerError::ShortWrite {
                written, expected, ..
            }) => {
                assert_eq!(written, 1);
                assert_eq!(expected, 5);
            }
            other => panic!("expected short write, got {other:?}"),
        }
        assert_eq!(handle.contents(), b"h");
    }

    /// A read error aborts the run before queued data is released
    #[tokio::test(start_paused = true)]
    async fn test_read_error_is_fatal() {
        let source = MockByteSource::new("in").chunk("ab").fail("disk gone");
        let sink = MemorySink::new("out");
        let handle = sink.handle();

        let err = Pipeline::new(settings(100))
            .run(source, sink)
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Reader(_)), "{err:?}");
        assert!(err.to_string().contains("disk gone"));
        assert!(handle.contents().is_empty());
        assert!(!handle.is_closed());
    }

    /// A slow sink never stalls input: the relay absorbs what the scheduler
    /// cannot take yet
    #[tokio::test(start_paused = true)]
    async fn test_relay_absorbs_while_sink_is_slow() {
        let chunks: Vec<String> = (0..20).map(|i| format!("{i:02}")).collect();
        let expected = chunks.concat();
        let sink = MemorySink::new("slow").write_latency(Duration::from_millis(50));
        let handle = sink.handle();

        let stats = Pipeline::new(settings(0))
            .run(MockByteSource::from_chunks("in", chunks), sink)
            .await
            .unwrap();

        assert_eq!(handle.contents(), expected.as_bytes());
        assert!(stats.relay_max_depth >= 10, "{stats}");
        assert!(stats.duration >= Duration::from_millis(20 * 50));
    }

    #[tokio::test]
    async fn test_empty_input_succeeds() {
        let sink = MemorySink::new("out");
        let handle = sink.handle();

        let stats = Pipeline::new(settings(50))
            .run(MockByteSource::new("empty"), sink)
            .await
            .unwrap();

        assert_eq!(stats.chunks_read, 0);
        assert_eq!(handle.write_count(), 0);
        assert!(handle.is_closed());
    }
}

#[cfg(test)]
mod config_tests {
    use std::time::Duration;

    use config_loader::{ConfigFormat, ConfigLoader, DelayConfig};

    /// `-1s` is refused before any stage could start
    #[test]
    fn test_negative_delay_rejected() {
        let config = DelayConfig {
            delay: Some("-1s".to_string()),
            ..Default::default()
        };

        let err = ConfigLoader::validate(&config).unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("cannot wait negative time"));
    }

    /// CLI/env values win over the file, the file wins over defaults
    #[test]
    fn test_config_precedence() {
        let file = ConfigLoader::load_from_str(
            "delay = \"5s\"\nchunk_size = 10\n",
            ConfigFormat::Toml,
        )
        .unwrap();
        let overrides = DelayConfig {
            delay: Some("1m30s".to_string()),
            ..Default::default()
        };

        let settings = file.merge(overrides).settings().unwrap();
        assert_eq!(settings.delay, Duration::from_secs(90));
        assert_eq!(settings.chunk_size, 10);

        let defaults = DelayConfig::default().settings().unwrap();
        assert_eq!(defaults.delay, Duration::from_secs(60));
        assert_eq!(defaults.chunk_size, 1024);
    }
}

#[cfg(test)]
mod file_io_tests {
    use std::time::Duration;

    use contracts::DelaySettings;
    use ingestion::ReaderSource;
    use pipeline::Pipeline;
    use sinks::WriterSink;

    /// File to file through the real adapters
    #[tokio::test]
    async fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.bin");
        let output = dir.path().join("out.bin");
        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
        std::fs::write(&input, &data).unwrap();

        let source = ReaderSource::open(&input).await.unwrap();
        let sink = WriterSink::create(&output).await.unwrap();
        let settings = DelaySettings::new(Duration::from_millis(10), 512).unwrap();

        let stats = Pipeline::new(settings).run(source, sink).await.unwrap();

        assert_eq!(std::fs::read(&output).unwrap(), data);
        assert_eq!(stats.bytes_released, data.len() as u64);
        assert!(stats.duration >= Duration::from_millis(10));
    }
}
