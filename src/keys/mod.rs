//! Relayer key management.
//!
//! # Data Flow
//! ```text
//! SIGNER_MNEMONIC (environment)
//!     → derivation.rs (`<seed>//account//0/<index>`, sr25519)
//!     → ss58.rs (public key → address with the configured format)
//!     → KeyDerivationService (immutable, address → key pair lookup)
//! ```

pub mod derivation;
pub mod ss58;

pub use derivation::{DerivedAccount, KeyDerivationService, DEFAULT_ACCOUNT_COUNT};
