//! Chain-facing value types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Two-dimensional execution cost (computation time, storage proof size).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasWeight {
    pub ref_time: u64,
    pub proof_size: u64,
}

impl GasWeight {
    pub const fn new(ref_time: u64, proof_size: u64) -> Self {
        Self {
            ref_time,
            proof_size,
        }
    }

    /// True when either dimension is above `ceiling`.
    pub fn exceeds(&self, ceiling: &GasWeight) -> bool {
        self.ref_time > ceiling.ref_time || self.proof_size > ceiling.proof_size
    }
}

impl fmt::Display for GasWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ref_time={}, proof_size={}", self.ref_time, self.proof_size)
    }
}

/// A `contracts.call` extrinsic before signing. Plain data, built locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedCall {
    pub contract: [u8; 32],
    pub value: u128,
    pub gas_limit: GasWeight,
    pub storage_deposit_limit: Option<u128>,
    pub calldata: Vec<u8>,
}

/// SCALE-encoded signed extrinsic, ready for submission by the caller.
#[derive(Clone, PartialEq, Eq)]
pub struct SignedTransaction(Vec<u8>);

impl SignedTransaction {
    pub fn new(encoded: Vec<u8>) -> Self {
        Self(encoded)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// `0x`-prefixed lowercase hex of the encoded extrinsic.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.0))
    }
}

impl fmt::Debug for SignedTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SignedTransaction").field(&self.0.len()).finish()
    }
}
