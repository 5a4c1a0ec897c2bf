//! Metrics collection and exposition.
//!
//! # Metrics
//! - `signer_requests_total` (counter): signing requests by outcome
//! - `signer_request_duration_seconds` (histogram): end-to-end signing latency
//! - `signer_gas_ref_time` / `signer_gas_proof_size` (histograms): dry-run estimates
//! - `signer_ready` (gauge): 1 once startup completed, 0 otherwise

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

use crate::chain::GasWeight;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a finished signing request. `outcome` is `"success"` or an error kind.
pub fn record_request(outcome: &'static str, start: Instant) {
    counter!("signer_requests_total", "outcome" => outcome).increment(1);
    histogram!("signer_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record the weight a dry-run reported.
pub fn record_gas_estimate(weight: &GasWeight) {
    histogram!("signer_gas_ref_time").record(weight.ref_time as f64);
    histogram!("signer_gas_proof_size").record(weight.proof_size as f64);
}

pub fn set_ready(ready: bool) {
    gauge!("signer_ready").set(if ready { 1.0 } else { 0.0 });
}
