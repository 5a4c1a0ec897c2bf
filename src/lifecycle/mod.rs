//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Chain config → Keys → Metadata → RPC handshake → Audit store → Listener → Ready
//!
//! Shutdown (shutdown.rs, signals.rs):
//!     SIGTERM/SIGINT → Not ready → Stop accepting → Drain → Persist audit → Exit
//! ```
//!
//! # Design Decisions
//! - Ordered startup; any step failing aborts the process
//! - Readiness is a flag the health route and signing route both read

pub mod readiness;
pub mod shutdown;
pub mod signals;
pub mod startup;

pub use readiness::Readiness;
pub use shutdown::Shutdown;
pub use signals::shutdown_signal;
