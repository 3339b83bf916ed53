//! Post-merge configuration validation.

use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;

const FAILURE_POLICIES: [&str; 2] = ["propagate", "isolate"];
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: [&str; 4] = ["pretty", "compact", "json", "full"];
const LOG_OUTPUTS: [&str; 3] = ["stderr", "stdout", "file"];

/// Validate a fully-merged and deserialized configuration.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_registry(config)?;
    validate_logging(config)?;
    Ok(())
}

fn validate_registry(config: &Config) -> ConfigResult<()> {
    one_of(
        "registry.failure_policy",
        "failure policy",
        &config.registry.failure_policy,
        &FAILURE_POLICIES,
    )
}

fn validate_logging(config: &Config) -> ConfigResult<()> {
    one_of(
        "logging.level",
        "log level",
        &config.logging.level,
        &LOG_LEVELS,
    )?;
    one_of(
        "logging.format",
        "log format",
        &config.logging.format,
        &LOG_FORMATS,
    )?;
    one_of(
        "logging.output",
        "log output",
        &config.logging.output,
        &LOG_OUTPUTS,
    )?;

    if config.logging.output == "file" && config.logging.directory.trim().is_empty() {
        return Err(ConfigError::Invalid {
            field: "logging.directory".to_owned(),
            message: "file output needs a log directory".to_owned(),
        });
    }

    if let Some(empty) = config.logging.directives.iter().position(|d| d.trim().is_empty()) {
        return Err(ConfigError::Invalid {
            field: format!("logging.directives[{empty}]"),
            message: "directive must not be empty".to_owned(),
        });
    }

    Ok(())
}

fn one_of(field: &str, what: &str, value: &str, allowed: &[&str]) -> ConfigResult<()> {
    if allowed.contains(&value) {
        return Ok(());
    }
    Err(ConfigError::Invalid {
        field: field.to_owned(),
        message: format!(
            "unsupported {what} '{value}'; expected one of: {}",
            allowed.join(", ")
        ),
    })
}
