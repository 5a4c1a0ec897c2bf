//! Signing error taxonomy.

use axum::http::StatusCode;
use thiserror::Error;

use crate::chain::types::GasWeight;
use crate::config::ConfigError;

/// Errors that can occur while serving a signing request.
#[derive(Debug, Error)]
pub enum SignerError {
    /// Missing or invalid startup parameter. Fatal at startup.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// RPC session could not be established.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Caller supplied an unusable request.
    #[error("{0}")]
    Validation(String),

    /// Sender address is not one of the derived relayer accounts.
    #[error("No key pair derived for address {0}")]
    KeyNotFound(String),

    /// Calldata could not be built from the request.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Dry-run RPC call failed or the contract rejected it.
    #[error("Gas estimation failed: {0}")]
    Estimation(String),

    /// Dry-run reported a weight above the configured ceiling.
    #[error("Estimated gas ({estimated}) exceeds ceiling ({ceiling})")]
    GasCeilingExceeded {
        estimated: GasWeight,
        ceiling: GasWeight,
    },

    /// Key pair or signing backend failure.
    #[error("Signing failed: {0}")]
    Signing(String),

    /// Audit store could not create or update a record.
    #[error("Audit store error: {0}")]
    Audit(String),
}

impl SignerError {
    /// Short label used for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            SignerError::Config(_) => "config",
            SignerError::Connection(_) => "connection",
            SignerError::Validation(_) => "validation",
            SignerError::KeyNotFound(_) => "key_not_found",
            SignerError::Encoding(_) => "encoding",
            SignerError::Estimation(_) => "estimation",
            SignerError::GasCeilingExceeded { .. } => "gas_ceiling",
            SignerError::Signing(_) => "signing",
            SignerError::Audit(_) => "audit",
        }
    }

    /// HTTP status for this error at the service boundary.
    pub fn status_code(&self) -> StatusCode {
        if self.is_caller_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    /// Whether the failure was caused by the request rather than the service.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            SignerError::Validation(_) | SignerError::KeyNotFound(_) | SignerError::Encoding(_)
        )
    }
}

/// Result type for signing operations.
pub type SignerResult<T> = Result<T, SignerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SignerError::Validation("no symbol to sign".into());
        assert_eq!(err.to_string(), "no symbol to sign");

        let err = SignerError::GasCeilingExceeded {
            estimated: GasWeight::new(20, 1),
            ceiling: GasWeight::new(10, 1),
        };
        assert!(err.to_string().contains("ref_time=20"));
    }

    #[test]
    fn test_caller_errors() {
        assert!(SignerError::KeyNotFound("5F".into()).is_caller_error());
        assert!(SignerError::Encoding("abc".into()).is_caller_error());
        assert!(!SignerError::Estimation("revert".into()).is_caller_error());
        assert!(!SignerError::Signing("backend".into()).is_caller_error());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            SignerError::Validation("no symbol to sign".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            SignerError::Estimation("revert".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        let ceiling = SignerError::GasCeilingExceeded {
            estimated: GasWeight::new(2, 2),
            ceiling: GasWeight::new(1, 1),
        };
        assert_eq!(ceiling.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_config_error_converts() {
        let err: SignerError = ConfigError::Missing("chain.rpc_url").into();
        assert_eq!(err.kind(), "config");
        assert!(err.to_string().contains("chain.rpc_url"));
    }
}
