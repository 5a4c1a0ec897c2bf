//! Signing endpoint.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};

use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::relay::SignRequest;

/// `POST /` and `POST /{*path}`: sign the submitted price data.
pub async fn sign_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    payload: Result<Json<SignRequest>, JsonRejection>,
) -> Response {
    if !state.readiness.is_ready() {
        return ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "Service is not ready",
            &method,
            &uri,
        )
        .into_response();
    }

    // Rejected bodies never reach the audit trail. Type and syntax errors
    // are treated alike so the audited request is always a well-formed one.
    let Json(request) = match payload {
        Ok(json) => json,
        Err(rejection) => {
            tracing::debug!(path = %uri.path(), error = %rejection, "Rejected request body");
            return ApiError::new(StatusCode::BAD_REQUEST, rejection.body_text(), &method, &uri)
                .into_response();
        }
    };

    // Once begun, a record must reach its outcome even if the timeout layer
    // or a client disconnect drops this future.
    let relay = state.relay.clone();
    let task = tokio::spawn(async move { relay.handle(&request).await });

    match task.await {
        Ok(Ok(response)) => (StatusCode::OK, Json(response)).into_response(),
        Ok(Err(e)) => ApiError::from_signer(&e, &method, &uri).into_response(),
        Err(e) => {
            tracing::error!(path = %uri.path(), error = %e, "Signing task failed");
            ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "signing task failed",
                &method,
                &uri,
            )
            .into_response()
        }
    }
}
