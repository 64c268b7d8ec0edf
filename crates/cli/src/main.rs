//! # delay
//!
//! Command-line entry point.
//!
//! Provides:
//! - configuration loading (file, env, flags) and validation
//! - logging to stderr, so stdout carries only the delayed stream
//! - the Reader → Relay → Scheduler pipeline from stdin/file to stdout/file

mod cli;
mod commands;

use clap::Parser;
use observability::ObservabilityConfig;
use tracing::info;

use cli::Cli;
use commands::{run_check, run_delay};

#[tokio::main]
async fn main() {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let logging = ObservabilityConfig {
        log_format: cli.log_format.into(),
        metrics_port: None,
        default_log_level: cli.log_level().to_string(),
    };
    if let Err(e) = observability::init_with_config(logging) {
        eprintln!("delay: logging: {e:#}");
        std::process::exit(1);
    }

    info!(version = env!("CARGO_PKG_VERSION"), "delay starting");

    let result = if cli.check {
        run_check(&cli)
    } else {
        run_delay(&cli).await
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "Command failed");
        eprintln!("delay: {e}");
        // Exit now: a stdin read parked on the blocking pool would otherwise
        // hold up runtime shutdown.
        std::process::exit(1);
    }
}
