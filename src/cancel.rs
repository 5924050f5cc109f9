//! Cooperative cancellation between page cycles.
//!
//! Rasterisation of a single page is never interrupted; the pipeline polls
//! the handle before each page and before finalizing. A cancelled run ends
//! in [`crate::error::Pdf2PptxError::Cancelled`] and produces no blob.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable request-to-stop flag shared between the caller and one pipeline.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request abandonment. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
