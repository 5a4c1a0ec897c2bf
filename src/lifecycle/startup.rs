//! Startup orchestration.
//!
//! # Order
//! 1. Typed chain config (every required field present)
//! 2. Relayer key derivation (seed phrase from the environment)
//! 3. Contract metadata
//! 4. RPC session and readiness handshake
//! 5. Audit store
//! 6. HTTP listener, then the readiness flag
//!
//! Any failure before step 6 is fatal; no request is served half-initialized.

use std::sync::Arc;
use tokio::net::TcpListener;

use crate::audit::{AuditLogger, MemoryAuditStore};
use crate::chain::{ChainClient, ContractAbi, SubstrateClient};
use crate::config::{AuditConfig, ChainConfig, SignerConfig};
use crate::error::{SignerError, SignerResult};
use crate::http::{AppState, HttpServer};
use crate::keys::KeyDerivationService;
use crate::lifecycle::{shutdown_signal, Readiness, Shutdown};
use crate::observability::metrics;
use crate::pipeline::SigningPipeline;
use crate::relay::RelayService;

/// Fully wired signing components.
#[derive(Debug, Clone)]
pub struct Services {
    pub relay: RelayService,
    pub readiness: Readiness,
    pub audit_store: Arc<MemoryAuditStore>,
}

/// Wire already-initialized components together. Performs no I/O.
pub fn assemble(
    chain_config: &ChainConfig,
    keys: KeyDerivationService,
    chain: Arc<dyn ChainClient>,
    abi: ContractAbi,
    audit_store: Arc<MemoryAuditStore>,
) -> Services {
    let pipeline = SigningPipeline::new(
        Arc::new(keys),
        chain,
        Arc::new(abi),
        chain_config.contract_account,
    );
    let audit = AuditLogger::new(audit_store.clone());

    Services {
        relay: RelayService::new(pipeline, audit, chain_config.network.clone()),
        readiness: Readiness::new(),
        audit_store,
    }
}

/// Run startup steps 1-5 against a live node.
pub async fn initialize(config: &SignerConfig) -> SignerResult<Services> {
    let chain_config = ChainConfig::from_settings(&config.chain)?;
    tracing::info!(
        network = %chain_config.network,
        contract = %chain_config.contract_address,
        address_format = chain_config.address_format,
        "Chain configuration loaded"
    );

    let keys = KeyDerivationService::from_env(
        Some(chain_config.address_format),
        chain_config.account_count,
    )?;
    for (index, address) in keys.addresses().enumerate() {
        tracing::info!(index, address = %address, "Relayer account");
    }

    let abi = ContractAbi::from_file(&chain_config.abi_path)?;
    let chain = SubstrateClient::connect(&chain_config).await?;
    let audit_store = open_audit_store(&config.audit)?;

    Ok(assemble(
        &chain_config,
        keys,
        Arc::new(chain),
        abi,
        Arc::new(audit_store),
    ))
}

/// Open the audit store, loading persisted records when a path is configured.
pub fn open_audit_store(config: &AuditConfig) -> SignerResult<MemoryAuditStore> {
    match &config.persistence_path {
        Some(path) => MemoryAuditStore::load_from_file(path)
            .map_err(|e| SignerError::Audit(format!("cannot load '{}': {}", path, e))),
        None => Ok(MemoryAuditStore::new(None)),
    }
}

/// Start the service and block until a shutdown signal arrives.
pub async fn run(config: SignerConfig) -> Result<(), Box<dyn std::error::Error>> {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }
    metrics::set_ready(false);

    let services = initialize(&config).await?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let state = AppState::new(
        services.relay.clone(),
        services.readiness.clone(),
        Arc::new(config),
    );
    let server = tokio::spawn(HttpServer::new(state).run(listener, shutdown.subscribe()));

    services.readiness.mark_ready();
    tracing::info!("Signer ready");

    shutdown_signal().await;
    services.readiness.mark_not_ready();
    shutdown.trigger();

    server.await??;

    if let Err(e) = services.audit_store.save_to_file() {
        tracing::error!(error = %e, "Failed to persist audit records");
    }
    tracing::info!(pending = services.audit_store.pending(), "Shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditStore;

    #[test]
    fn test_audit_store_without_path() {
        let store = open_audit_store(&AuditConfig::default()).unwrap();
        assert!(store.is_empty());
        assert!(store.save_to_file().is_ok());
    }

    #[tokio::test]
    async fn test_audit_store_loads_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.json");

        let first = MemoryAuditStore::new(Some(path.clone()));
        first.create("testnet", "{}".into()).await.unwrap();
        first.save_to_file().unwrap();

        let config = AuditConfig {
            persistence_path: Some(path.display().to_string()),
        };
        let reopened = open_audit_store(&config).unwrap();
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.pending(), 1);
    }

    #[test]
    fn test_corrupt_audit_file_is_audit_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.json");
        std::fs::write(&path, "not json").unwrap();

        let config = AuditConfig {
            persistence_path: Some(path.display().to_string()),
        };
        assert!(matches!(open_audit_store(&config), Err(SignerError::Audit(_))));
    }
}
