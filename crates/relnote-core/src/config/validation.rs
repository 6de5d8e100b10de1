//! Configuration validation

use tracing::debug;

use crate::error::{ConfigError, Result};

use super::types::Config;

/// Output formats understood by the renderers
pub const OUTPUT_FORMATS: &[&str] = &["markdown", "json"];

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    debug!("validating configuration");
    validate_source(config)?;
    validate_github(config)?;
    validate_range(config)?;
    validate_output(config)?;
    debug!("configuration validation passed");
    Ok(())
}

fn validate_source(config: &Config) -> Result<()> {
    if config.source.remote.is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "source.remote".to_string(),
            message: "remote cannot be empty".to_string(),
        }
        .into());
    }

    Ok(())
}

fn validate_github(config: &Config) -> Result<()> {
    if config.github.api_url.is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "github.api_url".to_string(),
            message: "API URL cannot be empty".to_string(),
        }
        .into());
    }

    if config.github.token_env.is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "github.token_env".to_string(),
            message: "token environment variable name cannot be empty".to_string(),
        }
        .into());
    }

    Ok(())
}

fn validate_range(config: &Config) -> Result<()> {
    if config.range.release_branch_prefix.is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "range.release_branch_prefix".to_string(),
            message: "prefix cannot be empty".to_string(),
        }
        .into());
    }

    if config.range.previous_release_depth == 0 {
        return Err(ConfigError::InvalidValue {
            field: "range.previous_release_depth".to_string(),
            message: "must be greater than zero".to_string(),
        }
        .into());
    }

    Ok(())
}

fn validate_output(config: &Config) -> Result<()> {
    if !OUTPUT_FORMATS.contains(&config.output.format.as_str()) {
        return Err(ConfigError::InvalidValue {
            field: "output.format".to_string(),
            message: format!("must be one of: {}", OUTPUT_FORMATS.join(", ")),
        }
        .into());
    }

    Ok(())
}
