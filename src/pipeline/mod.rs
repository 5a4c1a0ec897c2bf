//! Price data → signed extrinsic.

pub mod price;
pub mod signer;

pub use price::{parse_rate, Price, PriceDataPayload, RelayArgs};
pub use signer::{SigningPipeline, NO_SYMBOL_MESSAGE};
