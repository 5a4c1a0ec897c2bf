//! Begin/finish hooks around one signing attempt.

use serde::Serialize;
use std::sync::Arc;

use crate::audit::store::{AuditOutcome, AuditStore};
use crate::error::{SignerError, SignerResult};

/// Records every signing attempt exactly once.
#[derive(Clone)]
pub struct AuditLogger {
    store: Arc<dyn AuditStore>,
}

impl AuditLogger {
    pub fn new(store: Arc<dyn AuditStore>) -> Self {
        Self { store }
    }

    /// Create the in-flight record for `payload`. Must succeed before signing starts.
    pub async fn begin<P: Serialize>(&self, network: &str, payload: &P) -> SignerResult<i64> {
        let payload = serde_json::to_string(payload)
            .map_err(|e| SignerError::Audit(format!("cannot serialize payload: {}", e)))?;
        let id = self.store.create(network, payload).await?;

        tracing::debug!(audit_id = id, network = %network, "Audit record created");
        Ok(id)
    }

    /// Mark record `id` successful with `response`.
    pub async fn mark_success<R: Serialize>(&self, id: i64, response: &R) -> SignerResult<()> {
        let response = serde_json::to_string(response)
            .map_err(|e| SignerError::Audit(format!("cannot serialize response: {}", e)))?;
        self.finish(id, AuditOutcome::Success { response }).await
    }

    /// Mark record `id` failed with `error`.
    pub async fn mark_failure(&self, id: i64, error: &str) -> SignerResult<()> {
        self.finish(
            id,
            AuditOutcome::Failure {
                error: error.to_string(),
            },
        )
        .await
    }

    async fn finish(&self, id: i64, outcome: AuditOutcome) -> SignerResult<()> {
        if !self.store.finalize(id, outcome).await? {
            tracing::warn!(audit_id = id, "Audit record already finalized; ignoring");
        }
        Ok(())
    }

    pub fn store(&self) -> &Arc<dyn AuditStore> {
        &self.store
    }
}

impl std::fmt::Debug for AuditLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditLogger").finish_non_exhaustive()
    }
}
