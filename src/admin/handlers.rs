use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;

use crate::http::server::AppState;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub network: String,
    pub relayer_accounts: usize,
    pub address_format: u16,
    pub uptime_secs: i64,
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    let keys = state.relay.pipeline().keys();

    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: if state.readiness.is_ready() {
            "operational"
        } else {
            "starting"
        },
        network: state.relay.network().to_string(),
        relayer_accounts: keys.len(),
        address_format: keys.address_format(),
        uptime_secs: (Utc::now() - state.started_at).num_seconds(),
    })
}

/// `GET /admin/requests/{id}`: one audit record.
pub async fn get_request(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match state.relay.audit().store().get(id).await {
        Ok(Some(record)) => (StatusCode::OK, Json(record)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Audit record not found").into_response(),
        Err(e) => {
            tracing::error!(audit_id = id, error = %e, "Failed to read audit record");
            (StatusCode::INTERNAL_SERVER_ERROR, "Audit store unavailable").into_response()
        }
    }
}
