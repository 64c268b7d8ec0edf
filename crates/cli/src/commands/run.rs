//! Default command: run the delay pipeline.

use std::path::Path;

use anyhow::{anyhow, Result};
use ingestion::{ByteSource, ReaderSource};
use pipeline::{Pipeline, PipelineStats};
use sinks::WriterSink;
use tracing::{info, warn};

use crate::cli::Cli;
use crate::commands::resolve_config;

/// Run the pipeline from the configured input to the configured output
pub async fn run_delay(cli: &Cli) -> Result<()> {
    let config = resolve_config(cli)?;
    let settings = config.settings().map_err(|e| anyhow!("config: {e}"))?;

    if let Some(port) = config.metrics_port() {
        observability::init_metrics_only(port).map_err(|e| anyhow!("metrics: {e:#}"))?;
        info!(port, "Prometheus exporter listening");
    }

    info!(
        delay = ?settings.delay,
        chunk_size = settings.chunk_size,
        input = ?config.input,
        output = ?config.output,
        "Configuration loaded"
    );

    let pipeline = Pipeline::new(settings);
    let output = config.output.as_deref();

    let run = async {
        match config.input.as_deref() {
            Some(path) => {
                let source = ReaderSource::open(path)
                    .await
                    .map_err(|e| anyhow!("input: cannot open '{}': {e}", path.display()))?;
                run_to_output(pipeline, source, output).await
            }
            None => run_to_output(pipeline, ReaderSource::stdin(), output).await,
        }
    };

    tokio::select! {
        result = run => {
            let stats = result?;
            info!(
                chunks = stats.chunks_released,
                bytes = stats.bytes_released,
                duration_secs = stats.duration.as_secs_f64(),
                throughput = format!("{:.0} B/s", stats.throughput()),
                "Pipeline completed successfully"
            );
            if cli.verbose > 0 {
                eprintln!("{stats}");
            }
            Ok(())
        }
        _ = shutdown_signal() => {
            warn!("Received shutdown signal, queued data discarded");
            Err(anyhow!("interrupted"))
        }
    }
}

async fn run_to_output<S>(pipeline: Pipeline, source: S, output: Option<&Path>) -> Result<PipelineStats>
where
    S: ByteSource + 'static,
{
    let stats = match output {
        Some(path) => {
            let sink = WriterSink::create(path)
                .await
                .map_err(|e| anyhow!("output: cannot create '{}': {e}", path.display()))?;
            pipeline.run(source, sink).await?
        }
        None => pipeline.run(source, WriterSink::stdout()).await?,
    };
    Ok(stats)
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
