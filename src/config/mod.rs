//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, all errors at once)
//!     → chain.rs (typed ChainConfig, built once)
//!     → shared by value / Arc with the signing subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no hot reload
//! - All sections have defaults; required chain fields are `Option` so that
//!   each absent one maps to its own error
//! - The seed phrase never lives in the file, only in the environment

pub mod chain;
pub mod loader;
pub mod schema;
pub mod validation;

pub use chain::ChainConfig;
pub use loader::{load_config, ConfigError};
pub use schema::{
    AdminConfig, AuditConfig, ChainSettings, ListenerConfig, ObservabilityConfig, SignerConfig,
};
pub use validation::{validate_config, ValidationError};

/// Environment variable holding the relayer seed phrase.
pub const MNEMONIC_ENV_VAR: &str = "SIGNER_MNEMONIC";
