//! Price data signing pipeline.
//!
//! # Flow
//! ```text
//! validate → encode relay calldata → resolve relayer key
//!          → dry-run estimate → ceiling check → assemble → sign
//! ```
//!
//! Each step aborts the request on failure. The only network call is the
//! dry-run; nothing is submitted and nothing is persisted here.

use std::sync::Arc;

use crate::chain::{ChainClient, ContractAbi, SignedTransaction};
use crate::error::{SignerError, SignerResult};
use crate::keys::KeyDerivationService;
use crate::observability::metrics;
use crate::pipeline::price::{PriceDataPayload, RelayArgs};

/// Message returned when a request carries no prices.
pub const NO_SYMBOL_MESSAGE: &str = "no symbol to sign";

/// Signs `relay` calls on behalf of the derived relayer accounts.
#[derive(Clone)]
pub struct SigningPipeline {
    keys: Arc<KeyDerivationService>,
    chain: Arc<dyn ChainClient>,
    abi: Arc<ContractAbi>,
    contract: [u8; 32],
}

impl SigningPipeline {
    pub fn new(
        keys: Arc<KeyDerivationService>,
        chain: Arc<dyn ChainClient>,
        abi: Arc<ContractAbi>,
        contract: [u8; 32],
    ) -> Self {
        Self {
            keys,
            chain,
            abi,
            contract,
        }
    }

    /// Produce a signed `contracts.call` relaying `price_data` from `sender`.
    pub async fn sign(
        &self,
        sender: &str,
        price_data: &PriceDataPayload,
        nonce: u64,
        tip: u128,
    ) -> SignerResult<SignedTransaction> {
        if price_data.prices.is_empty() {
            return Err(SignerError::Validation(NO_SYMBOL_MESSAGE.to_string()));
        }

        let args = RelayArgs::from_payload(price_data)?;
        let calldata = self.abi.encode_message(&args)?;

        let account = self.keys.get_keypair(sender)?;

        let estimate = self
            .chain
            .estimate_gas(&account.public_key, &self.contract, &calldata)
            .await?;
        metrics::record_gas_estimate(&estimate);

        let ceiling = self.chain.max_gas();
        if estimate.exceeds(&ceiling) {
            return Err(SignerError::GasCeilingExceeded {
                estimated: estimate,
                ceiling,
            });
        }

        tracing::debug!(
            sender = %sender,
            request_id = price_data.request_id,
            symbols = args.symbol_rates.len(),
            gas = %estimate,
            "Gas estimated"
        );

        let call = self
            .chain
            .build_unsigned_call(self.contract, 0, estimate, None, calldata);

        self.chain.sign_call(&call, &account.keypair, nonce, tip)
    }

    pub fn keys(&self) -> &KeyDerivationService {
        &self.keys
    }
}

impl std::fmt::Debug for SigningPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningPipeline")
            .field("keys", &self.keys)
            .field("contract", &hex::encode(self.contract))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{GasWeight, UnsignedCall};
    use crate::pipeline::price::Price;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use subxt_signer::sr25519::Keypair;

    const DEV_PHRASE: &str = "bottom drive obey lake curtain smoke basket hold race lonely fit walk";

    const METADATA: &str = r#"{"spec": {"messages": [
        {"label": "relay", "selector": "0xd2cdf8a3", "args": [
            {"label": "symbol_rates"}, {"label": "resolve_time"}, {"label": "request_id"}
        ]}
    ]}}"#;

    struct FakeChain {
        estimate: GasWeight,
        estimates: AtomicUsize,
        signed: Mutex<Vec<(UnsignedCall, u64, u128)>>,
    }

    impl FakeChain {
        fn new(estimate: GasWeight) -> Self {
            Self {
                estimate,
                estimates: AtomicUsize::new(0),
                signed: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChainClient for FakeChain {
        fn max_gas(&self) -> GasWeight {
            GasWeight::new(1_000, 1_000)
        }

        async fn estimate_gas(
            &self,
            _caller: &[u8; 32],
            _contract: &[u8; 32],
            _calldata: &[u8],
        ) -> SignerResult<GasWeight> {
            self.estimates.fetch_add(1, Ordering::SeqCst);
            Ok(self.estimate)
        }

        fn sign_call(
            &self,
            call: &UnsignedCall,
            _keypair: &Keypair,
            nonce: u64,
            tip: u128,
        ) -> SignerResult<SignedTransaction> {
            self.signed.lock().unwrap().push((call.clone(), nonce, tip));
            Ok(SignedTransaction::new(vec![0x00]))
        }
    }

    fn pipeline(chain: Arc<FakeChain>) -> (SigningPipeline, String) {
        let keys = Arc::new(KeyDerivationService::init(Some(DEV_PHRASE), Some(42), 2).unwrap());
        let sender = keys.account(1).unwrap().address.clone();
        let abi = Arc::new(ContractAbi::from_json(METADATA).unwrap());
        (SigningPipeline::new(keys, chain, abi, [9u8; 32]), sender)
    }

    fn payload(rate: &str) -> PriceDataPayload {
        PriceDataPayload {
            prices: vec![Price {
                symbol: "BTC".into(),
                rate: rate.into(),
            }],
            resolve_time: 1_705_393_641,
            request_id: 1,
        }
    }

    #[tokio::test]
    async fn test_sign_assembles_call_with_estimate() {
        let chain = Arc::new(FakeChain::new(GasWeight::new(10, 20)));
        let (pipeline, sender) = pipeline(chain.clone());

        let signed = pipeline.sign(&sender, &payload("50000.9"), 7, 3).await.unwrap();
        assert_eq!(signed.to_hex(), "0x00");

        let signed_calls = chain.signed.lock().unwrap();
        let (call, nonce, tip) = &signed_calls[0];
        assert_eq!(call.contract, [9u8; 32]);
        assert_eq!(call.value, 0);
        assert_eq!(call.gas_limit, GasWeight::new(10, 20));
        assert_eq!(call.storage_deposit_limit, None);
        assert_eq!(&call.calldata[..4], &[0xd2, 0xcd, 0xf8, 0xa3]);
        assert_eq!((*nonce, *tip), (7, 3));
    }

    #[tokio::test]
    async fn test_empty_prices_skip_chain() {
        let chain = Arc::new(FakeChain::new(GasWeight::new(1, 1)));
        let (pipeline, sender) = pipeline(chain.clone());

        let mut empty = payload("1");
        empty.prices.clear();

        let err = pipeline.sign(&sender, &empty, 0, 0).await.unwrap_err();
        assert!(matches!(err, SignerError::Validation(ref m) if m == NO_SYMBOL_MESSAGE));
        assert_eq!(chain.estimates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_bad_rate_fails_before_rpc() {
        let chain = Arc::new(FakeChain::new(GasWeight::new(1, 1)));
        let (pipeline, sender) = pipeline(chain.clone());

        let err = pipeline.sign(&sender, &payload("abc"), 0, 0).await.unwrap_err();
        assert!(matches!(err, SignerError::Encoding(_)));
        assert_eq!(chain.estimates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_sender() {
        let chain = Arc::new(FakeChain::new(GasWeight::new(1, 1)));
        let (pipeline, _) = pipeline(chain.clone());

        let err = pipeline
            .sign("5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY", &payload("1"), 0, 0)
            .await
            .unwrap_err();
        assert!(matches!(err, SignerError::KeyNotFound(_)));
        assert_eq!(chain.estimates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_estimate_above_ceiling_is_rejected() {
        let chain = Arc::new(FakeChain::new(GasWeight::new(1, 1_001)));
        let (pipeline, sender) = pipeline(chain.clone());

        let err = pipeline.sign(&sender, &payload("1"), 0, 0).await.unwrap_err();
        assert!(matches!(err, SignerError::GasCeilingExceeded { .. }));
        assert!(chain.signed.lock().unwrap().is_empty());
    }
}
