//! Audited request handling.

use std::time::Instant;

use crate::audit::AuditLogger;
use crate::error::SignerResult;
use crate::observability::metrics;
use crate::pipeline::SigningPipeline;
use crate::relay::request::{SignRequest, SignResponse};

/// Ties one signing attempt to exactly one audit record.
#[derive(Clone, Debug)]
pub struct RelayService {
    pipeline: SigningPipeline,
    audit: AuditLogger,
    network: String,
}

impl RelayService {
    pub fn new(pipeline: SigningPipeline, audit: AuditLogger, network: impl Into<String>) -> Self {
        Self {
            pipeline,
            audit,
            network: network.into(),
        }
    }

    /// Record, sign, then record the outcome.
    ///
    /// If the audit record cannot be created, signing does not run. Errors
    /// while recording the outcome are logged; the signing result stands.
    pub async fn handle(&self, request: &SignRequest) -> SignerResult<SignResponse> {
        let start = Instant::now();
        let audit_id = match self.audit.begin(&self.network, request).await {
            Ok(id) => id,
            Err(e) => {
                metrics::record_request(e.kind(), start);
                return Err(e);
            }
        };

        let result = self
            .pipeline
            .sign(
                &request.from,
                &request.price_data,
                request.nonce,
                request.tip,
            )
            .await
            .map(|signed| SignResponse {
                tx: signed.to_hex(),
            });

        let recorded = match &result {
            Ok(response) => {
                tracing::info!(
                    audit_id,
                    from = %request.from,
                    request_id = request.price_data.request_id,
                    nonce = request.nonce,
                    "Price data signed"
                );
                metrics::record_request("success", start);
                self.audit.mark_success(audit_id, response).await
            }
            Err(e) => {
                tracing::warn!(
                    audit_id,
                    from = %request.from,
                    request_id = request.price_data.request_id,
                    kind = e.kind(),
                    error = %e,
                    "Signing failed"
                );
                metrics::record_request(e.kind(), start);
                self.audit.mark_failure(audit_id, &e.to_string()).await
            }
        };

        if let Err(e) = recorded {
            tracing::error!(audit_id, error = %e, "Failed to record signing outcome");
        }

        result
    }

    pub fn network(&self) -> &str {
        &self.network
    }

    pub fn pipeline(&self) -> &SigningPipeline {
        &self.pipeline
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }
}
