//! Configuration loading from disk.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::PrepareConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading and environment resolution.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),

    /// A required environment variable is absent or empty.
    #[error("Missing required environment variable {0}")]
    MissingEnv(&'static str),

    /// An environment variable is present but unusable.
    #[error("Invalid environment variable {name}: {reason}")]
    InvalidEnv { name: &'static str, reason: String },
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<PrepareConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: PrepareConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load configuration from `path` if given, otherwise use validated defaults.
pub fn load_or_default(path: Option<&Path>) -> Result<PrepareConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => {
            let config = PrepareConfig::default();
            validate_config(&config).map_err(ConfigError::Validation)?;
            Ok(config)
        }
    }
}
