//! Config validation
//!
//! Rules:
//! - delay parses and is not negative
//! - chunk_size within range
//! - input and output are not the same file

use contracts::ContractError;

use crate::DelayConfig;

/// Validate a parsed DelayConfig
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(config: &DelayConfig) -> Result<(), ContractError> {
    config.settings()?;
    validate_paths(config)?;
    Ok(())
}

fn validate_paths(config: &DelayConfig) -> Result<(), ContractError> {
    if let (Some(input), Some(output)) = (&config.input, &config.output) {
        if input == output {
            return Err(ContractError::config_validation(
                "output",
                format!("output must differ from input ({})", input.display()),
            ));
        }
    }
    Ok(())
}
