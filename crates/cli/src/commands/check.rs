//! `--check` implementation.

use anyhow::{anyhow, Result};
use config_loader::DelayConfig;
use tracing::info;

use crate::cli::Cli;
use crate::commands::resolve_config;

/// Validate the configuration and print what a run would use
pub fn run_check(cli: &Cli) -> Result<()> {
    let config = resolve_config(cli)?;
    let settings = config.settings().map_err(|e| anyhow!("config: {e}"))?;

    info!("Check mode - configuration is valid, exiting");
    print_config_summary(&config, settings.delay, settings.chunk_size);
    Ok(())
}

fn print_config_summary(config: &DelayConfig, delay: std::time::Duration, chunk_size: usize) {
    let describe = |path: &Option<std::path::PathBuf>, fallback: &str| {
        path.as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| fallback.to_string())
    };

    println!("=== Configuration Summary ===");
    println!("Delay: {delay:?}");
    println!("Chunk size: {chunk_size} bytes");
    println!("Input: {}", describe(&config.input, "<stdin>"));
    println!("Output: {}", describe(&config.output, "<stdout>"));
    match config.metrics_port() {
        Some(port) => println!("Metrics: 0.0.0.0:{port}"),
        None => println!("Metrics: disabled"),
    }
}
