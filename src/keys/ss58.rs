//! SS58 address codec.
//!
//! `base58(prefix ++ public_key ++ blake2b_512("SS58PRE" ++ prefix ++ public_key)[..2])`
//! with a one-byte prefix for formats below 64 and the two-byte form up to 16383.

use blake2::{Blake2b512, Digest};
use thiserror::Error;

const CHECKSUM_PREIMAGE: &[u8] = b"SS58PRE";
const CHECKSUM_LEN: usize = 2;
const KEY_LEN: usize = 32;

/// Errors decoding an SS58 string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Ss58Error {
    #[error("invalid base58: {0}")]
    Base58(String),

    #[error("unexpected address length {0}")]
    Length(usize),

    #[error("reserved address prefix byte {0}")]
    ReservedPrefix(u8),

    #[error("checksum mismatch")]
    Checksum,
}

/// Encode a 32-byte public key with the given address format.
pub fn encode(public_key: &[u8; KEY_LEN], format: u16) -> String {
    let mut data = prefix_bytes(format);
    data.extend_from_slice(public_key);
    let checksum = checksum(&data);
    data.extend_from_slice(&checksum);
    bs58::encode(data).into_string()
}

/// Decode an SS58 address into `(format, public_key)`.
pub fn decode(address: &str) -> Result<(u16, [u8; KEY_LEN]), Ss58Error> {
    let data = bs58::decode(address)
        .into_vec()
        .map_err(|e| Ss58Error::Base58(e.to_string()))?;

    let first = *data.first().ok_or(Ss58Error::Length(0))?;
    let (prefix_len, format) = match first {
        0..=63 => (1, u16::from(first)),
        64..=127 => {
            let second = *data.get(1).ok_or(Ss58Error::Length(data.len()))?;
            let lower = (first << 2) | (second >> 6);
            let upper = second & 0b0011_1111;
            (2, u16::from(lower) | (u16::from(upper) << 8))
        }
        _ => return Err(Ss58Error::ReservedPrefix(first)),
    };

    if data.len() != prefix_len + KEY_LEN + CHECKSUM_LEN {
        return Err(Ss58Error::Length(data.len()));
    }

    let body_len = prefix_len + KEY_LEN;
    let expected = checksum(&data[..body_len]);
    if data[body_len..] != expected {
        return Err(Ss58Error::Checksum);
    }

    let mut key = [0u8; KEY_LEN];
    key.copy_from_slice(&data[prefix_len..body_len]);
    Ok((format, key))
}

fn prefix_bytes(format: u16) -> Vec<u8> {
    match format {
        0..=63 => vec![format as u8],
        _ => {
            let first = (((format & 0b0000_0000_1111_1100) >> 2) as u8) | 0b0100_0000;
            let second = ((format >> 8) as u8) | (((format & 0b0000_0000_0000_0011) as u8) << 6);
            vec![first, second]
        }
    }
}

fn checksum(data: &[u8]) -> [u8; CHECKSUM_LEN] {
    let mut hasher = Blake2b512::new();
    hasher.update(CHECKSUM_PREIMAGE);
    hasher.update(data);
    let digest = hasher.finalize();
    [digest[0], digest[1]]
}
