//! Shared fixtures for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use subxt_signer::sr25519::Keypair;

use price_signer::audit::{AuditOutcome, AuditRecord, AuditStore, MemoryAuditStore};
use price_signer::chain::{ChainClient, ContractAbi, GasWeight, SignedTransaction, UnsignedCall};
use price_signer::config::{ChainConfig, ChainSettings, SignerConfig};
use price_signer::error::{SignerError, SignerResult};
use price_signer::http::{AppState, HttpServer};
use price_signer::keys::KeyDerivationService;
use price_signer::lifecycle::startup::{assemble, Services};
use price_signer::lifecycle::Shutdown;
use price_signer::pipeline::{Price, PriceDataPayload};
use price_signer::relay::SignRequest;

/// Well-known development phrase.
pub const DEV_PHRASE: &str = "bottom drive obey lake curtain smoke basket hold race lonely fit walk";

pub const NETWORK: &str = "testnet";

pub const ADMIN_KEY: &str = "test-admin-key";

/// Chain stub: fixed estimate (or error), one-byte signatures, call counters.
pub struct StubChain {
    estimate: Result<GasWeight, String>,
    delay: Duration,
    pub estimate_calls: AtomicUsize,
    pub sign_calls: AtomicUsize,
}

impl StubChain {
    pub fn succeeding() -> Arc<Self> {
        Arc::new(Self {
            estimate: Ok(GasWeight::new(1, 1)),
            delay: Duration::ZERO,
            estimate_calls: AtomicUsize::new(0),
            sign_calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            estimate: Err(message.to_string()),
            delay: Duration::ZERO,
            estimate_calls: AtomicUsize::new(0),
            sign_calls: AtomicUsize::new(0),
        })
    }

    /// Succeeds, but each dry-run takes `delay`.
    pub fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            estimate: Ok(GasWeight::new(1, 1)),
            delay,
            estimate_calls: AtomicUsize::new(0),
            sign_calls: AtomicUsize::new(0),
        })
    }

    pub fn estimates(&self) -> usize {
        self.estimate_calls.load(Ordering::SeqCst)
    }

    pub fn signatures(&self) -> usize {
        self.sign_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChainClient for StubChain {
    fn max_gas(&self) -> GasWeight {
        GasWeight::new(1_000_000, 1_000_000)
    }

    async fn estimate_gas(
        &self,
        _caller: &[u8; 32],
        _contract: &[u8; 32],
        _calldata: &[u8],
    ) -> SignerResult<GasWeight> {
        self.estimate_calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.estimate.clone().map_err(SignerError::Estimation)
    }

    fn sign_call(
        &self,
        _call: &UnsignedCall,
        _keypair: &Keypair,
        _nonce: u64,
        _tip: u128,
    ) -> SignerResult<SignedTransaction> {
        self.sign_calls.fetch_add(1, Ordering::SeqCst);
        Ok(SignedTransaction::new(vec![0x00]))
    }
}

/// Audit store whose writes always fail.
pub struct FailingStore;

#[async_trait]
impl AuditStore for FailingStore {
    async fn create(&self, _network: &str, _payload: String) -> SignerResult<i64> {
        Err(SignerError::Audit("disk full".to_string()))
    }

    async fn finalize(&self, _id: i64, _outcome: AuditOutcome) -> SignerResult<bool> {
        Err(SignerError::Audit("disk full".to_string()))
    }

    async fn get(&self, _id: i64) -> SignerResult<Option<AuditRecord>> {
        Ok(None)
    }
}

pub fn abi_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("abi/std_reference.json")
}

pub fn chain_config() -> ChainConfig {
    ChainConfig::from_settings(&ChainSettings {
        network: Some(NETWORK.into()),
        address_format: Some(42),
        rpc_url: Some("ws://127.0.0.1:9944".into()),
        abi_path: Some(abi_path().display().to_string()),
        max_ref_time: Some(1_000_000),
        max_proof_size: Some(1_000_000),
        contract_address: Some("5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY".into()),
        ..ChainSettings::default()
    })
    .unwrap()
}

/// Wire a relay service around `chain` with ten derived accounts.
pub fn services(chain: Arc<StubChain>) -> Services {
    let config = chain_config();
    let keys = KeyDerivationService::init(Some(DEV_PHRASE), Some(config.address_format), 10).unwrap();
    let abi = ContractAbi::from_file(&config.abi_path).unwrap();
    assemble(
        &config,
        keys,
        chain,
        abi,
        Arc::new(MemoryAuditStore::default()),
    )
}

/// Address of derived relayer `index`.
pub fn relayer(services: &Services, index: usize) -> String {
    services
        .relay
        .pipeline()
        .keys()
        .account(index)
        .unwrap()
        .address
        .clone()
}

pub fn sign_request(from: &str, prices: &[(&str, &str)]) -> SignRequest {
    SignRequest {
        price_data: PriceDataPayload {
            prices: prices
                .iter()
                .map(|(symbol, rate)| Price {
                    symbol: symbol.to_string(),
                    rate: rate.to_string(),
                })
                .collect(),
            resolve_time: 1_705_393_641,
            request_id: 1,
        },
        from: from.to_string(),
        nonce: 0,
        tip: 0,
    }
}

/// Serve `services` on an ephemeral port with the admin API enabled.
pub async fn spawn_server(services: &Services) -> (SocketAddr, Shutdown) {
    spawn_server_with(services, SignerConfig::default()).await
}

/// Like [`spawn_server`], starting from `config`.
pub async fn spawn_server_with(services: &Services, mut config: SignerConfig) -> (SocketAddr, Shutdown) {
    config.admin.enabled = true;
    config.admin.api_key = ADMIN_KEY.to_string();

    let state = AppState::new(
        services.relay.clone(),
        services.readiness.clone(),
        Arc::new(config),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(state);
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    (addr, shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
