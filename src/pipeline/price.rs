//! Price payload and `relay` message arguments.

use codec::Encode;
use serde::{Deserialize, Serialize};

use crate::chain::MessageArgs;
use crate::error::{SignerError, SignerResult};

/// One symbol/rate pair as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    pub symbol: String,
    /// Decimal string; only the leading integer part is relayed.
    pub rate: String,
}

/// Price data to relay into the reference contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceDataPayload {
    pub prices: Vec<Price>,
    pub resolve_time: u64,
    pub request_id: u64,
}

/// Arguments of `relay(symbol_rates, resolve_time, request_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Encode)]
pub struct RelayArgs {
    pub symbol_rates: Vec<(String, u64)>,
    pub resolve_time: u64,
    pub request_id: u64,
}

impl MessageArgs for RelayArgs {
    const LABEL: &'static str = "relay";
    const ARITY: usize = 3;
}

impl RelayArgs {
    /// Convert a payload, parsing every rate.
    pub fn from_payload(payload: &PriceDataPayload) -> SignerResult<Self> {
        let symbol_rates = payload
            .prices
            .iter()
            .map(|p| Ok((p.symbol.clone(), parse_rate(&p.rate)?)))
            .collect::<SignerResult<Vec<_>>>()?;

        Ok(Self {
            symbol_rates,
            resolve_time: payload.resolve_time,
            request_id: payload.request_id,
        })
    }
}

/// Parse the leading base-10 integer of `rate`.
///
/// Leading whitespace and a `+` sign are accepted and anything after the
/// digits is ignored, so `"50000.75"` yields `50000`. Negative values,
/// strings without leading digits and values above `u64::MAX` are rejected.
pub fn parse_rate(rate: &str) -> SignerResult<u64> {
    let trimmed = rate.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);

    if unsigned.starts_with('-') {
        return Err(SignerError::Encoding(format!("negative rate '{}'", rate)));
    }

    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let digits = &unsigned[..end];

    if digits.is_empty() {
        return Err(SignerError::Encoding(format!("rate '{}' is not a number", rate)));
    }

    digits
        .parse::<u64>()
        .map_err(|_| SignerError::Encoding(format!("rate '{}' does not fit in u64", rate)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rate_truncates() {
        assert_eq!(parse_rate("50000").unwrap(), 50_000);
        assert_eq!(parse_rate("50000.75").unwrap(), 50_000);
        assert_eq!(parse_rate("  +12abc").unwrap(), 12);
        assert_eq!(parse_rate("0").unwrap(), 0);
    }

    #[test]
    fn test_parse_rate_rejects() {
        for bad in ["abc", "", ".5", "-1", "18446744073709551616"] {
            assert!(
                matches!(parse_rate(bad), Err(SignerError::Encoding(_))),
                "expected encoding error for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_payload_wire_names() {
        let payload: PriceDataPayload = serde_json::from_value(serde_json::json!({
            "prices": [{"symbol": "BTC", "rate": "50000"}],
            "resolveTime": 1705393641,
            "requestId": 1
        }))
        .unwrap();

        let args = RelayArgs::from_payload(&payload).unwrap();
        assert_eq!(args.symbol_rates, vec![("BTC".to_string(), 50_000)]);
        assert_eq!(args.resolve_time, 1_705_393_641);
        assert_eq!(args.request_id, 1);
    }
}
