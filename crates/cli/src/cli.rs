//! CLI argument definitions using clap.

use clap::{ArgAction, Parser, ValueEnum};
use config_loader::DelayConfig;
use std::path::PathBuf;

/// delay - hold a byte stream for a fixed time, then pass it on
#[derive(Parser, Debug)]
#[command(
    name = "delay",
    author,
    version,
    about = "Hold a byte stream for a fixed time, then pass it on",
    long_about = "Reads from stdin (or --input) and writes every chunk to stdout (or --output) \n\
                  once it has been held for the configured delay. Order and content are \n\
                  preserved; everything still queued at end of input is drained before exit."
)]
pub struct Cli {
    /// The amount of time to hold data before re-sending it [default: 1m]
    ///
    /// Accepts Go-style durations such as 250ms, 1.5s, 1h30m.
    #[arg(
        short,
        long,
        value_name = "DURATION",
        allow_hyphen_values = true,
        env = "DELAY_DURATION"
    )]
    pub delay: Option<String>,

    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, env = "DELAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Maximum number of bytes taken from the input per read [default: 1024]
    #[arg(long, value_name = "BYTES", env = "DELAY_CHUNK_SIZE")]
    pub chunk_size: Option<usize>,

    /// Read from this file instead of stdin
    #[arg(short, long, env = "DELAY_INPUT")]
    pub input: Option<PathBuf>,

    /// Write to this file instead of stdout
    #[arg(short, long, env = "DELAY_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Metrics server port (0 = disabled)
    #[arg(long, env = "DELAY_METRICS_PORT")]
    pub metrics_port: Option<u16>,

    /// Validate configuration and exit without reading input
    #[arg(long)]
    pub check: bool,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, env = "DELAY_VERBOSE")]
    pub verbose: u8,

    /// Suppress all diagnostics except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(long, value_enum, default_value = "compact", env = "DELAY_LOG_FORMAT")]
    pub log_format: LogFormat,
}

impl Cli {
    /// Settings given on the command line or through the environment
    ///
    /// Only the fields actually set are `Some`, so the result can be merged
    /// over a file configuration.
    pub fn overrides(&self) -> DelayConfig {
        DelayConfig {
            delay: self.delay.clone(),
            chunk_size: self.chunk_size,
            input: self.input.clone(),
            output: self.output.clone(),
            metrics_port: self.metrics_port,
        }
    }

    /// Default tracing filter derived from `-v`/`-q`
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    #[default]
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => observability::LogFormat::Json,
            LogFormat::Pretty => observability::LogFormat::Pretty,
            LogFormat::Compact => observability::LogFormat::Compact,
        }
    }
}
