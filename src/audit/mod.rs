//! Audit trail of signing attempts.
//!
//! # Data Flow
//! ```text
//! request → AuditLogger::begin (record created, success = None)
//!         → signing pipeline
//!         → mark_success(response) | mark_failure(error)   exactly once
//!         → MemoryAuditStore (DashMap, saved to JSON on shutdown)
//! ```

pub mod logger;
pub mod store;

pub use logger::AuditLogger;
pub use store::{AuditOutcome, AuditRecord, AuditStore, MemoryAuditStore};
