//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that every required chain parameter is present
//! - Validate value ranges (timeouts > 0, SS58 format, gas caps)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SignerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::{ChainSettings, SignerConfig};
use crate::keys::ss58;

/// Largest SS58 address format representable in the two-byte prefix form.
pub const MAX_ADDRESS_FORMAT: u16 = 16_383;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("`{0}` is required")]
    Missing(&'static str),

    #[error("`{field}` is invalid: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ValidationError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &SignerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::invalid(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }
    if config.listener.request_timeout_secs == 0 {
        errors.push(ValidationError::invalid(
            "listener.request_timeout_secs",
            "must be greater than zero",
        ));
    }

    validate_chain(&config.chain, &mut errors);

    // A dry-run must give up before the HTTP deadline answers the client.
    if config.chain.rpc_timeout_secs > 0
        && config.listener.request_timeout_secs > 0
        && config.chain.rpc_timeout_secs >= config.listener.request_timeout_secs
    {
        errors.push(ValidationError::invalid(
            "chain.rpc_timeout_secs",
            format!(
                "must be below listener.request_timeout_secs ({})",
                config.listener.request_timeout_secs
            ),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::invalid(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if config.admin.enabled && config.admin.api_key.trim().is_empty() {
        errors.push(ValidationError::invalid(
            "admin.api_key",
            "must be set when the admin API is enabled",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_chain(chain: &ChainSettings, errors: &mut Vec<ValidationError>) {
    match chain.chain_type.as_deref() {
        None => errors.push(ValidationError::Missing("chain.chain_type")),
        Some("substrate") => {}
        Some(other) => errors.push(ValidationError::invalid(
            "chain.chain_type",
            format!("unknown chain type '{}'", other),
        )),
    }

    if chain.network.as_deref().map_or(true, |n| n.trim().is_empty()) {
        errors.push(ValidationError::Missing("chain.network"));
    }

    match chain.address_format {
        None => errors.push(ValidationError::Missing("chain.address_format")),
        Some(format) if format > MAX_ADDRESS_FORMAT => errors.push(ValidationError::invalid(
            "chain.address_format",
            format!("{} exceeds {}", format, MAX_ADDRESS_FORMAT),
        )),
        Some(_) => {}
    }

    match chain.rpc_url.as_deref() {
        None => errors.push(ValidationError::Missing("chain.rpc_url")),
        Some(raw) => match url::Url::parse(raw) {
            Ok(url) if matches!(url.scheme(), "ws" | "wss") => {}
            Ok(url) => errors.push(ValidationError::invalid(
                "chain.rpc_url",
                format!("unsupported scheme '{}', expected ws or wss", url.scheme()),
            )),
            Err(e) => errors.push(ValidationError::invalid("chain.rpc_url", e.to_string())),
        },
    }

    if chain.abi_path.is_none() {
        errors.push(ValidationError::Missing("chain.abi_path"));
    }

    match chain.max_ref_time {
        None => errors.push(ValidationError::Missing("chain.max_ref_time")),
        Some(0) => errors.push(ValidationError::invalid("chain.max_ref_time", "must be greater than zero")),
        Some(_) => {}
    }
    match chain.max_proof_size {
        None => errors.push(ValidationError::Missing("chain.max_proof_size")),
        Some(0) => errors.push(ValidationError::invalid("chain.max_proof_size", "must be greater than zero")),
        Some(_) => {}
    }

    match chain.contract_address.as_deref() {
        None => errors.push(ValidationError::Missing("chain.contract_address")),
        Some(address) => {
            if let Err(e) = ss58::decode(address) {
                errors.push(ValidationError::invalid("chain.contract_address", e.to_string()));
            }
        }
    }

    if chain.account_count == 0 {
        errors.push(ValidationError::invalid("chain.account_count", "must be greater than zero"));
    }
    if chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::invalid("chain.rpc_timeout_secs", "must be greater than zero"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> SignerConfig {
        let mut config = SignerConfig::default();
        config.chain.network = Some("testnet".into());
        config.chain.address_format = Some(42);
        config.chain.rpc_url = Some("ws://127.0.0.1:9944".into());
        config.chain.abi_path = Some("abi/std_reference.json".into());
        config.chain.max_ref_time = Some(50_000_000_000);
        config.chain.max_proof_size = Some(500_000);
        config.chain.contract_address =
            Some("5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY".into());
        config
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_unknown_chain_type() {
        let mut config = valid_config();
        config.chain.chain_type = Some("evm".into());
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("evm"));
    }

    #[test]
    fn test_bad_contract_address_and_scheme() {
        let mut config = valid_config();
        config.chain.contract_address = Some("not-an-address".into());
        config.chain.rpc_url = Some("ftp://node".into());
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_http_rpc_url_rejected() {
        for raw in ["http://127.0.0.1:9933", "https://rpc.astar.network"] {
            let mut config = valid_config();
            config.chain.rpc_url = Some(raw.into());
            let errors = validate_config(&config).unwrap_err();
            assert_eq!(errors.len(), 1);
            assert!(errors[0].to_string().contains("expected ws or wss"));
        }

        let mut config = valid_config();
        config.chain.rpc_url = Some("wss://rpc.astar.network".into());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_rpc_timeout_must_undercut_request_timeout() {
        let mut config = valid_config();
        config.listener.request_timeout_secs = 10;
        config.chain.rpc_timeout_secs = 10;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            &errors[0],
            ValidationError::Invalid { field: "chain.rpc_timeout_secs", .. }
        ));

        config.chain.rpc_timeout_secs = 9;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_zero_gas_caps_rejected() {
        let mut config = valid_config();
        config.chain.max_ref_time = Some(0);
        config.chain.max_proof_size = Some(0);
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_admin_requires_key() {
        let mut config = valid_config();
        config.admin.enabled = true;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::Invalid {
            field: "admin.api_key",
            reason: "must be set when the admin API is enabled".into(),
        }));
    }
}
