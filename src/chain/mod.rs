//! Chain access subsystem.
//!
//! # Data Flow
//! ```text
//! ink! metadata (abi.rs)       → calldata = selector ++ SCALE(args)
//! calldata → client.rs         → ContractsApi_call dry-run (dry_run.rs layout)
//!          → GasWeight         → UnsignedCall (types.rs)
//!          → sign_call         → SignedTransaction
//! ```
//!
//! # Design Decisions
//! - `ChainClient` is the seam between the pipeline and the node; tests stub it
//! - One RPC session per process, opened at startup and shared read-only
//! - Nothing is submitted; the signed extrinsic goes back to the caller

pub mod abi;
pub mod client;
pub mod dry_run;
pub mod types;

pub use abi::{ContractAbi, MessageArgs};
pub use client::{ChainClient, SubstrateClient};
pub use types::{GasWeight, SignedTransaction, UnsignedCall};
