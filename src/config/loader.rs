//! Configuration loading from disk.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::SignerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading and startup parameters.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(
        "Validation failed: {}",
        .0.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
    )]
    Validation(Vec<ValidationError>),

    /// A required chain parameter is absent.
    #[error("missing required setting `{0}`")]
    Missing(&'static str),

    #[error("unsupported chain type `{0}`")]
    UnsupportedChain(String),

    #[error("invalid contract address: {0}")]
    InvalidContractAddress(String),

    #[error("seed phrase not provided")]
    MissingSeedPhrase,

    #[error("invalid seed phrase: {0}")]
    InvalidSeedPhrase(String),

    #[error("contract metadata error: {0}")]
    Abi(String),
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<SignerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<SignerConfig, ConfigError> {
    let config: SignerConfig = toml::from_str(content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
