//! Typed, validated chain parameters.

use std::path::PathBuf;
use std::time::Duration;

use crate::chain::types::GasWeight;
use crate::config::loader::ConfigError;
use crate::config::schema::ChainSettings;
use crate::keys::ss58;

/// Startup parameters every signing component reads. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConfig {
    pub network: String,
    pub address_format: u16,
    pub rpc_url: String,
    pub abi_path: PathBuf,
    pub max_ref_time: u64,
    pub max_proof_size: u64,
    /// Contract address as configured (SS58).
    pub contract_address: String,
    /// Raw 32-byte account id decoded from `contract_address`.
    pub contract_account: [u8; 32],
    pub account_count: usize,
    pub rpc_timeout: Duration,
}

impl ChainConfig {
    /// Build the typed configuration from the raw `[chain]` section.
    ///
    /// Each absent required field is reported as its own
    /// [`ConfigError::Missing`].
    pub fn from_settings(settings: &ChainSettings) -> Result<Self, ConfigError> {
        let chain_type = settings
            .chain_type
            .as_deref()
            .ok_or(ConfigError::Missing("chain.chain_type"))?;
        if chain_type != "substrate" {
            return Err(ConfigError::UnsupportedChain(chain_type.to_string()));
        }

        let network = settings
            .network
            .clone()
            .filter(|n| !n.trim().is_empty())
            .ok_or(ConfigError::Missing("chain.network"))?;
        let address_format = settings
            .address_format
            .ok_or(ConfigError::Missing("chain.address_format"))?;
        let rpc_url = settings
            .rpc_url
            .clone()
            .ok_or(ConfigError::Missing("chain.rpc_url"))?;
        let abi_path = settings
            .abi_path
            .as_ref()
            .map(PathBuf::from)
            .ok_or(ConfigError::Missing("chain.abi_path"))?;
        let max_ref_time = settings
            .max_ref_time
            .ok_or(ConfigError::Missing("chain.max_ref_time"))?;
        let max_proof_size = settings
            .max_proof_size
            .ok_or(ConfigError::Missing("chain.max_proof_size"))?;
        let contract_address = settings
            .contract_address
            .clone()
            .ok_or(ConfigError::Missing("chain.contract_address"))?;

        let (_, contract_account) = ss58::decode(&contract_address)
            .map_err(|e| ConfigError::InvalidContractAddress(e.to_string()))?;

        Ok(Self {
            network,
            address_format,
            rpc_url,
            abi_path,
            max_ref_time,
            max_proof_size,
            contract_address,
            contract_account,
            account_count: settings.account_count,
            rpc_timeout: Duration::from_secs(settings.rpc_timeout_secs),
        })
    }

    /// Gas ceiling used as the dry-run cap.
    pub fn max_gas(&self) -> GasWeight {
        GasWeight::new(self.max_ref_time, self.max_proof_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> ChainSettings {
        ChainSettings {
            network: Some("testnet".into()),
            address_format: Some(42),
            rpc_url: Some("ws://127.0.0.1:9944".into()),
            abi_path: Some("abi/std_reference.json".into()),
            max_ref_time: Some(1_000),
            max_proof_size: Some(2_000),
            contract_address: Some("5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY".into()),
            ..ChainSettings::default()
        }
    }

    #[test]
    fn test_from_settings() {
        let config = ChainConfig::from_settings(&settings()).unwrap();
        assert_eq!(config.network, "testnet");
        assert_eq!(config.max_gas(), GasWeight::new(1_000, 2_000));
        assert_eq!(
            hex::encode(config.contract_account),
            "d43593c715fdd31c61141abd04a99fd6822c8558854ccde39a5684e7a56da27d"
        );
        assert_eq!(config.rpc_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_each_missing_field_is_enumerated() {
        let mut s = settings();
        s.rpc_url = None;
        assert!(matches!(
            ChainConfig::from_settings(&s),
            Err(ConfigError::Missing("chain.rpc_url"))
        ));

        let mut s = settings();
        s.address_format = None;
        assert!(matches!(
            ChainConfig::from_settings(&s),
            Err(ConfigError::Missing("chain.address_format"))
        ));

        let mut s = settings();
        s.network = Some("  ".into());
        assert!(matches!(
            ChainConfig::from_settings(&s),
            Err(ConfigError::Missing("chain.network"))
        ));
    }

    #[test]
    fn test_unsupported_chain() {
        let mut s = settings();
        s.chain_type = Some("cosmwasm".into());
        assert!(matches!(
            ChainConfig::from_settings(&s),
            Err(ConfigError::UnsupportedChain(t)) if t == "cosmwasm"
        ));
    }

    #[test]
    fn test_invalid_contract_address() {
        let mut s = settings();
        s.contract_address = Some("5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQZ".into());
        assert!(matches!(
            ChainConfig::from_settings(&s),
            Err(ConfigError::InvalidContractAddress(_))
        ));
    }
}
