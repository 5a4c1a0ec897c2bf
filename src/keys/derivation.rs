//! Relayer key derivation and lookup.
//!
//! # Security
//! - The seed phrase is read ONLY from the environment
//! - Neither the phrase nor derived secrets are logged or serialized
//! - The derived set is immutable after `init` and shared read-only

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use subxt_signer::sr25519::Keypair;
use subxt_signer::SecretUri;

use crate::config::{ConfigError, MNEMONIC_ENV_VAR};
use crate::error::{SignerError, SignerResult};
use crate::keys::ss58;

/// Number of relayer accounts derived when the config does not say otherwise.
pub const DEFAULT_ACCOUNT_COUNT: usize = 10;

/// Derivation path for relayer `index`, appended to the seed phrase.
pub fn derivation_path(index: usize) -> String {
    format!("//account//0/{}", index)
}

/// One derived relayer identity.
pub struct DerivedAccount {
    pub index: usize,
    pub keypair: Keypair,
    pub public_key: [u8; 32],
    pub address: String,
}

impl fmt::Debug for DerivedAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedAccount")
            .field("index", &self.index)
            .field("address", &self.address)
            .finish()
    }
}

/// Fixed, indexed set of sr25519 key pairs derived from one seed phrase.
pub struct KeyDerivationService {
    accounts: Vec<DerivedAccount>,
    by_address: HashMap<String, usize>,
    address_format: u16,
}

impl KeyDerivationService {
    /// Derive `count` key pairs using `<seed>//account//0/<index>`.
    ///
    /// Fails with a config error when the seed phrase or address format is
    /// absent, or when the phrase is not a usable secret.
    pub fn init(
        seed_phrase: Option<&str>,
        address_format: Option<u16>,
        count: usize,
    ) -> SignerResult<Self> {
        let seed_phrase = seed_phrase
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingSeedPhrase)?;
        let address_format = address_format.ok_or(ConfigError::Missing("chain.address_format"))?;

        let mut accounts = Vec::with_capacity(count);
        let mut by_address = HashMap::with_capacity(count);

        for index in 0..count {
            let account = derive_account(seed_phrase, address_format, index)?;
            by_address.insert(account.address.clone(), index);
            accounts.push(account);
        }

        tracing::info!(
            count = accounts.len(),
            address_format = address_format,
            "Relayer key pairs derived"
        );

        Ok(Self {
            accounts,
            by_address,
            address_format,
        })
    }

    /// Derive from the `SIGNER_MNEMONIC` environment variable.
    pub fn from_env(address_format: Option<u16>, count: usize) -> SignerResult<Self> {
        let phrase = std::env::var(MNEMONIC_ENV_VAR).ok();
        Self::init(phrase.as_deref(), address_format, count)
    }

    /// Exact-match lookup of a derived account by its address.
    pub fn get_keypair(&self, address: &str) -> SignerResult<&DerivedAccount> {
        self.by_address
            .get(address)
            .map(|&index| &self.accounts[index])
            .ok_or_else(|| SignerError::KeyNotFound(address.to_string()))
    }

    /// Derived addresses in index order.
    pub fn addresses(&self) -> impl Iterator<Item = &str> {
        self.accounts.iter().map(|a| a.address.as_str())
    }

    /// Account at `index`, if derived.
    pub fn account(&self, index: usize) -> Option<&DerivedAccount> {
        self.accounts.get(index)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn address_format(&self) -> u16 {
        self.address_format
    }
}

impl fmt::Debug for KeyDerivationService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyDerivationService")
            .field("accounts", &self.accounts.len())
            .field("address_format", &self.address_format)
            .finish()
    }
}

fn derive_account(seed_phrase: &str, address_format: u16, index: usize) -> SignerResult<DerivedAccount> {
    // Errors from the URI parser can echo the input, so they are not forwarded.
    let uri = SecretUri::from_str(&format!("{}{}", seed_phrase, derivation_path(index)))
        .map_err(|_| ConfigError::InvalidSeedPhrase("malformed secret URI".to_string()))?;
    let keypair = Keypair::from_uri(&uri)
        .map_err(|e| ConfigError::InvalidSeedPhrase(e.to_string()))?;

    let public_key = keypair.public_key().0;
    let address = ss58::encode(&public_key, address_format);

    Ok(DerivedAccount {
        index,
        keypair,
        public_key,
        address,
    })
}
