//! HTTP boundary.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum router, request ID, trace span, timeout)
//!     → sign.rs (JSON body → RelayService)
//!     → response.rs (SignerError → {message, timestamp, route, method})
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;
pub mod sign;

pub use request::X_REQUEST_ID;
pub use response::{ApiError, ErrorBody};
pub use server::{AppState, HttpServer};
