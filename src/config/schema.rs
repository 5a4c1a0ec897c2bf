//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the signer.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the price signer.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SignerConfig {
    /// Listener configuration (bind address, request timeout).
    pub listener: ListenerConfig,

    /// Chain and contract parameters.
    pub chain: ChainSettings,

    /// Audit trail settings.
    pub audit: AuditConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub admin: AdminConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Request timeout (total time for request/response) in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Raw chain section as written in the config file.
///
/// Required fields are optional here; [`crate::config::ChainConfig`] is the
/// validated form.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainSettings {
    /// Chain family. Only `"substrate"` is supported.
    pub chain_type: Option<String>,

    /// Network name recorded with every audit record.
    pub network: Option<String>,

    /// SS58 address format used to render relayer addresses.
    pub address_format: Option<u16>,

    /// RPC endpoint (ws:// or wss://).
    pub rpc_url: Option<String>,

    /// Path to the ink! contract metadata JSON.
    pub abi_path: Option<String>,

    /// Dry-run cap for computation time.
    pub max_ref_time: Option<u64>,

    /// Dry-run cap for storage proof size.
    pub max_proof_size: Option<u64>,

    /// SS58 address of the reference contract.
    pub contract_address: Option<String>,

    /// Number of relayer accounts derived from the seed phrase.
    pub account_count: usize,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,
}

impl Default for ChainSettings {
    fn default() -> Self {
        Self {
            chain_type: Some("substrate".to_string()),
            network: None,
            address_format: None,
            rpc_url: None,
            abi_path: None,
            max_ref_time: None,
            max_proof_size: None,
            contract_address: None,
            account_count: 10,
            rpc_timeout_secs: 10,
        }
    }
}

/// Audit store configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AuditConfig {
    /// JSON file the audit records are loaded from and saved to on shutdown.
    pub persistence_path: Option<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Admin API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Enable the admin routes.
    pub enabled: bool,

    /// API key for authentication (Bearer token).
    pub api_key: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: String::new(),
        }
    }
}
