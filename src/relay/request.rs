//! Wire types of the signing endpoint.

use serde::{Deserialize, Serialize};

use crate::pipeline::PriceDataPayload;

/// Body of a signing request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignRequest {
    pub price_data: PriceDataPayload,
    /// SS58 address of the relayer that signs.
    pub from: String,
    pub nonce: u64,
    pub tip: u128,
}

/// Body of a successful signing response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignResponse {
    /// `0x`-prefixed hex of the signed extrinsic.
    pub tx: String,
}
