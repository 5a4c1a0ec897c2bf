//! Signing requests as seen by the service boundary.

pub mod request;
pub mod service;

pub use request::{SignRequest, SignResponse};
pub use service::RelayService;
