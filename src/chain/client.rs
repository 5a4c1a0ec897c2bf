//! Substrate RPC client for contract dry-runs and offline signing.
//!
//! # Responsibilities
//! - Open one RPC session and complete the readiness handshake
//! - Dry-run contract calls to estimate required weight
//! - Assemble `contracts.call` and sign it offline with a caller nonce/tip
//!
//! The session is a single jsonrpsee client shared by the legacy RPC methods
//! and the `OnlineClient`. It multiplexes concurrent requests, so estimates
//! from parallel signing requests need no extra locking.

use async_trait::async_trait;
use codec::{Decode, Encode};
use std::time::Duration;
use subxt::backend::legacy::LegacyRpcMethods;
use subxt::backend::rpc::RpcClient;
use subxt::config::DefaultExtrinsicParamsBuilder;
use subxt::dynamic::Value;
use subxt::{OnlineClient, PolkadotConfig};
use subxt_signer::sr25519::Keypair;
use tokio::time::timeout;

use crate::chain::dry_run::{ContractCallArgs, DryRunResult};
use crate::chain::types::{GasWeight, SignedTransaction, UnsignedCall};
use crate::config::ChainConfig;
use crate::error::{SignerError, SignerResult};

/// Runtime API used for the read-only contract call.
const CONTRACTS_CALL_API: &str = "ContractsApi_call";

/// Operations the signing pipeline needs from the chain.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Gas ceiling passed as the dry-run cap.
    fn max_gas(&self) -> GasWeight;

    /// Dry-run `calldata` against `contract` as `caller` and return the
    /// weight the chain reports as required.
    async fn estimate_gas(
        &self,
        caller: &[u8; 32],
        contract: &[u8; 32],
        calldata: &[u8],
    ) -> SignerResult<GasWeight>;

    /// Assemble an unsigned `contracts.call`. Local and infallible.
    fn build_unsigned_call(
        &self,
        contract: [u8; 32],
        value: u128,
        gas_limit: GasWeight,
        storage_deposit_limit: Option<u128>,
        calldata: Vec<u8>,
    ) -> UnsignedCall {
        UnsignedCall {
            contract,
            value,
            gas_limit,
            storage_deposit_limit,
            calldata,
        }
    }

    /// Sign `call` with `keypair` using the given nonce and tip.
    fn sign_call(
        &self,
        call: &UnsignedCall,
        keypair: &Keypair,
        nonce: u64,
        tip: u128,
    ) -> SignerResult<SignedTransaction>;
}

/// `ChainClient` backed by a live Substrate node.
#[derive(Clone)]
pub struct SubstrateClient {
    api: OnlineClient<PolkadotConfig>,
    rpc: LegacyRpcMethods<PolkadotConfig>,
    max_gas: GasWeight,
    rpc_url: String,
    rpc_timeout: Duration,
}

impl SubstrateClient {
    /// Open the RPC session and wait until the node is ready.
    ///
    /// The handshake fetches genesis hash, runtime version and metadata, and
    /// checks that the runtime exposes the Contracts pallet.
    pub async fn connect(config: &ChainConfig) -> SignerResult<Self> {
        let rpc_timeout = config.rpc_timeout;

        let rpc_client = timeout(rpc_timeout, RpcClient::from_insecure_url(&config.rpc_url))
            .await
            .map_err(|_| {
                SignerError::Connection(format!(
                    "timed out after {}s connecting to {}",
                    rpc_timeout.as_secs(),
                    config.rpc_url
                ))
            })?
            .map_err(|e| {
                SignerError::Connection(format!("cannot connect to {}: {}", config.rpc_url, e))
            })?;

        let api = timeout(
            rpc_timeout,
            OnlineClient::<PolkadotConfig>::from_rpc_client(rpc_client.clone()),
        )
        .await
        .map_err(|_| SignerError::Connection("timed out waiting for node readiness".to_string()))?
        .map_err(|e| SignerError::Connection(format!("readiness handshake failed: {}", e)))?;

        if api.metadata().pallet_by_name("Contracts").is_none() {
            return Err(SignerError::Connection(
                "connected runtime has no Contracts pallet".to_string(),
            ));
        }

        let client = Self {
            api,
            rpc: LegacyRpcMethods::new(rpc_client),
            max_gas: config.max_gas(),
            rpc_url: config.rpc_url.clone(),
            rpc_timeout,
        };

        tracing::info!(
            rpc_url = %client.rpc_url,
            spec_version = client.api.runtime_version().spec_version,
            max_ref_time = client.max_gas.ref_time,
            max_proof_size = client.max_gas.proof_size,
            "Chain client ready"
        );

        Ok(client)
    }

    /// Check that the node still answers.
    pub async fn is_healthy(&self) -> bool {
        matches!(
            timeout(self.rpc_timeout, self.rpc.system_health()).await,
            Ok(Ok(_))
        )
    }
}

#[async_trait]
impl ChainClient for SubstrateClient {
    fn max_gas(&self) -> GasWeight {
        self.max_gas
    }

    async fn estimate_gas(
        &self,
        caller: &[u8; 32],
        contract: &[u8; 32],
        calldata: &[u8],
    ) -> SignerResult<GasWeight> {
        let args = ContractCallArgs {
            origin: *caller,
            dest: *contract,
            value: 0,
            gas_limit: Some(self.max_gas.into()),
            storage_deposit_limit: None,
            input_data: calldata.to_vec(),
        }
        .encode();

        let bytes = timeout(
            self.rpc_timeout,
            self.rpc.state_call(CONTRACTS_CALL_API, Some(args.as_slice()), None),
        )
        .await
        .map_err(|_| {
            SignerError::Estimation(format!(
                "dry-run timed out after {}s",
                self.rpc_timeout.as_secs()
            ))
        })?
        .map_err(|e| SignerError::Estimation(format!("dry-run RPC failed: {}", e)))?;

        let result = DryRunResult::decode(&mut &bytes[..])
            .map_err(|e| SignerError::Estimation(format!("undecodable dry-run result: {}", e)))?;

        tracing::debug!(
            gas_consumed_ref_time = result.gas_consumed.ref_time,
            gas_required_ref_time = result.gas_required.ref_time,
            gas_required_proof_size = result.gas_required.proof_size,
            "Dry-run completed"
        );

        result.into_gas_required()
    }

    fn sign_call(
        &self,
        call: &UnsignedCall,
        keypair: &Keypair,
        nonce: u64,
        tip: u128,
    ) -> SignerResult<SignedTransaction> {
        let payload = subxt::dynamic::tx("Contracts", "call", call_fields(call));
        let params = DefaultExtrinsicParamsBuilder::<PolkadotConfig>::new()
            .nonce(nonce)
            .tip(tip)
            .build();

        let extrinsic = self
            .api
            .tx()
            .create_signed_offline(&payload, keypair, params)
            .map_err(|e| SignerError::Signing(e.to_string()))?;

        Ok(SignedTransaction::new(extrinsic.encoded().to_vec()))
    }
}

impl std::fmt::Debug for SubstrateClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubstrateClient")
            .field("rpc_url", &self.rpc_url)
            .field("max_gas", &self.max_gas)
            .field("timeout_secs", &self.rpc_timeout.as_secs())
            .finish()
    }
}

/// Field values of `Contracts::call { dest, value, gas_limit, storage_deposit_limit, data }`.
fn call_fields(call: &UnsignedCall) -> Vec<Value> {
    let storage_deposit_limit = match call.storage_deposit_limit {
        Some(limit) => Value::unnamed_variant("Some", [Value::u128(limit)]),
        None => Value::unnamed_variant("None", Vec::new()),
    };

    vec![
        Value::unnamed_variant("Id", [Value::from_bytes(call.contract)]),
        Value::u128(call.value),
        Value::named_composite([
            ("ref_time", Value::u128(u128::from(call.gas_limit.ref_time))),
            ("proof_size", Value::u128(u128::from(call.gas_limit.proof_size))),
        ]),
        storage_deposit_limit,
        Value::from_bytes(&call.calldata),
    ]
}
