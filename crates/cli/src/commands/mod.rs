//! Command implementations.

mod check;
mod run;

pub use check::run_check;
pub use run::run_delay;

use anyhow::{anyhow, Result};
use config_loader::{ConfigLoader, DelayConfig};
use tracing::info;

use crate::cli::Cli;

/// Assemble the effective configuration: file, then CLI/env overrides
///
/// The merged result is validated here, so a bad delay or chunk size is
/// reported before any input is read or output created.
pub(crate) fn resolve_config(cli: &Cli) -> Result<DelayConfig> {
    let base = match &cli.config {
        Some(path) => {
            info!(config = %path.display(), "Loading configuration");
            ConfigLoader::load_from_path(path)
                .map_err(|e| anyhow!("config: {}: {e}", path.display()))?
        }
        None => DelayConfig::default(),
    };

    let config = base.merge(cli.overrides());
    ConfigLoader::validate(&config).map_err(|e| anyhow!("config: {e}"))?;
    Ok(config)
}
