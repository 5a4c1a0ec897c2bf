//! Error responses.
//!
//! Every failure leaves the service as
//! `{message, timestamp, route, method}`; internals beyond the message
//! are never exposed.

use axum::{
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SignerError;

/// JSON body of an error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    /// RFC 3339 UTC time the error was rendered.
    pub timestamp: String,
    pub route: String,
    pub method: String,
}

/// An error bound to the request it answers.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    route: String,
    method: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>, method: &Method, uri: &Uri) -> Self {
        Self {
            status,
            message: message.into(),
            route: uri.path().to_string(),
            method: method.to_string(),
        }
    }

    pub fn from_signer(err: &SignerError, method: &Method, uri: &Uri) -> Self {
        Self::new(err.status_code(), err.to_string(), method, uri)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            message: self.message,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            route: self.route,
            method: self.method,
        };
        (self.status, Json(body)).into_response()
    }
}
