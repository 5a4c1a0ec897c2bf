//! ink! contract metadata and message encoding.
//!
//! Calldata for a message is its 4-byte selector followed by the SCALE
//! encoding of the argument tuple. Only the `spec.messages` part of the
//! metadata is read; argument types are checked by arity.

use codec::Encode;
use serde::Deserialize;
use std::path::Path;

use crate::config::ConfigError;
use crate::error::{SignerError, SignerResult};

/// Typed argument tuple for one contract message.
pub trait MessageArgs: Encode {
    /// Message label in the metadata.
    const LABEL: &'static str;
    /// Number of arguments the message takes.
    const ARITY: usize;
}

#[derive(Debug, Deserialize)]
struct InkMetadata {
    spec: ContractSpec,
}

#[derive(Debug, Deserialize)]
struct ContractSpec {
    messages: Vec<MessageSpec>,
}

#[derive(Debug, Clone, Deserialize)]
struct MessageSpec {
    label: String,
    selector: String,
    #[serde(default)]
    args: Vec<ArgSpec>,
}

#[derive(Debug, Clone, Deserialize)]
struct ArgSpec {
    label: String,
}

/// A message resolved from the metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub label: String,
    pub selector: [u8; 4],
    pub arg_labels: Vec<String>,
}

/// Contract ABI loaded from ink! metadata JSON.
#[derive(Debug, Clone)]
pub struct ContractAbi {
    messages: Vec<Message>,
}

impl ContractAbi {
    /// Parse metadata JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let metadata: InkMetadata =
            serde_json::from_str(json).map_err(|e| ConfigError::Abi(e.to_string()))?;

        let messages = metadata
            .spec
            .messages
            .into_iter()
            .map(|m| {
                let selector = parse_selector(&m.selector).ok_or_else(|| {
                    ConfigError::Abi(format!("message '{}' has invalid selector '{}'", m.label, m.selector))
                })?;
                Ok(Message {
                    label: m.label,
                    selector,
                    arg_labels: m.args.into_iter().map(|a| a.label).collect(),
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(Self { messages })
    }

    /// Read and parse a metadata file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::Abi(format!("cannot read '{}': {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    /// Look up a message by label.
    pub fn message(&self, label: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.label == label)
    }

    /// Encode `args` as calldata for `A::LABEL`.
    pub fn encode_message<A: MessageArgs>(&self, args: &A) -> SignerResult<Vec<u8>> {
        let message = self.message(A::LABEL).ok_or_else(|| {
            SignerError::Encoding(format!("contract has no '{}' message", A::LABEL))
        })?;

        if message.arg_labels.len() != A::ARITY {
            return Err(SignerError::Encoding(format!(
                "message '{}' takes {} arguments, got {}",
                message.label,
                message.arg_labels.len(),
                A::ARITY
            )));
        }

        let mut calldata = message.selector.to_vec();
        args.encode_to(&mut calldata);
        Ok(calldata)
    }
}

fn parse_selector(raw: &str) -> Option<[u8; 4]> {
    let bytes = hex::decode(raw.strip_prefix("0x").unwrap_or(raw)).ok()?;
    bytes.try_into().ok()
}
