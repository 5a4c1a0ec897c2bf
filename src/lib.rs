//! Substrate price data signer.
//!
//! Derives relayer keys from one seed phrase, turns price data into a signed
//! `contracts.call` of the reference contract's `relay` message, and records
//! every attempt in an audit trail.

pub mod admin;
pub mod audit;
pub mod chain;
pub mod config;
pub mod error;
pub mod http;
pub mod keys;
pub mod lifecycle;
pub mod observability;
pub mod pipeline;
pub mod relay;

pub use config::schema::SignerConfig;
pub use error::{SignerError, SignerResult};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
