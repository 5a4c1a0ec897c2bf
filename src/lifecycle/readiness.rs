//! Service readiness flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::observability::metrics;

/// Set once every startup step succeeded; cleared when shutdown begins.
#[derive(Clone, Debug, Default)]
pub struct Readiness(Arc<AtomicBool>);

impl Readiness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn mark_ready(&self) {
        self.0.store(true, Ordering::Release);
        metrics::set_ready(true);
    }

    pub fn mark_not_ready(&self) {
        self.0.store(false, Ordering::Release);
        metrics::set_ready(false);
    }
}
