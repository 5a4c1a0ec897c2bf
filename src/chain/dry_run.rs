//! SCALE layout of the `ContractsApi_call` runtime API.
//!
//! Request: `(origin, dest, value, Option<Weight>, Option<Balance>, input_data)`.
//! Response: `ContractResult { gas_consumed, gas_required, storage_deposit,
//! debug_message, result, events }`. Decoding stops after `result`; trailing
//! events are never read.

use codec::{Decode, Encode, Input};

use crate::chain::types::GasWeight;
use crate::error::{SignerError, SignerResult};

/// Bit set in `ExecReturnValue::flags` when the contract reverted.
const FLAG_REVERT: u32 = 0x0000_0001;

/// `sp_weights::Weight`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub struct Weight {
    #[codec(compact)]
    pub ref_time: u64,
    #[codec(compact)]
    pub proof_size: u64,
}

impl From<GasWeight> for Weight {
    fn from(w: GasWeight) -> Self {
        Self {
            ref_time: w.ref_time,
            proof_size: w.proof_size,
        }
    }
}

impl From<Weight> for GasWeight {
    fn from(w: Weight) -> Self {
        GasWeight::new(w.ref_time, w.proof_size)
    }
}

/// Arguments of the dry-run call.
#[derive(Debug, Clone, Encode)]
pub struct ContractCallArgs {
    pub origin: [u8; 32],
    pub dest: [u8; 32],
    pub value: u128,
    pub gas_limit: Option<Weight>,
    pub storage_deposit_limit: Option<u128>,
    pub input_data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Decode)]
pub enum StorageDeposit {
    Refund(u128),
    Charge(u128),
}

/// Outcome of the contract execution inside the dry-run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecOutcome {
    Returned { flags: u32, data: Vec<u8> },
    /// `DispatchError` with its variant index; the payload is left undecoded.
    DispatchFailed { variant: u8 },
}

/// Leading fields of `ContractResult`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DryRunResult {
    pub gas_consumed: Weight,
    pub gas_required: Weight,
    pub storage_deposit: StorageDeposit,
    pub debug_message: Vec<u8>,
    pub result: ExecOutcome,
}

impl Decode for DryRunResult {
    fn decode<I: Input>(input: &mut I) -> Result<Self, codec::Error> {
        let gas_consumed = Weight::decode(input)?;
        let gas_required = Weight::decode(input)?;
        let storage_deposit = StorageDeposit::decode(input)?;
        let debug_message = Vec::<u8>::decode(input)?;
        let result = match input.read_byte()? {
            0 => ExecOutcome::Returned {
                flags: u32::decode(input)?,
                data: Vec::<u8>::decode(input)?,
            },
            1 => ExecOutcome::DispatchFailed {
                variant: input.read_byte()?,
            },
            _ => return Err("invalid ContractResult.result variant".into()),
        };

        Ok(Self {
            gas_consumed,
            gas_required,
            storage_deposit,
            debug_message,
            result,
        })
    }
}

impl DryRunResult {
    /// Required weight, or an estimation error if the call would not succeed.
    pub fn into_gas_required(self) -> SignerResult<GasWeight> {
        let debug = String::from_utf8_lossy(&self.debug_message).trim().to_string();
        let suffix = if debug.is_empty() {
            String::new()
        } else {
            format!(" ({})", debug)
        };

        match self.result {
            ExecOutcome::Returned { flags, .. } if flags & FLAG_REVERT != 0 => Err(
                SignerError::Estimation(format!("contract reverted during dry-run{}", suffix)),
            ),
            ExecOutcome::Returned { .. } => Ok(self.gas_required.into()),
            ExecOutcome::DispatchFailed { variant } => Err(SignerError::Estimation(format!(
                "dispatch error (variant {}) during dry-run{}",
                variant, suffix
            ))),
        }
    }
}
