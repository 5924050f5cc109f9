//! Progress-callback trait for per-page conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as the pipeline appends each slide.
//!
//! Notifications are fire-and-forget. The pipeline calls the observer
//! synchronously, ignores the return, and catches panics: a misbehaving
//! observer is logged and skipped, it never aborts a conversion.
//!
//! # Example
//!
//! ```rust
//! use pdf2pptx::{ConversionConfig, ConversionProgressCallback};
//! use std::sync::Arc;
//!
//! struct PrintProgress;
//!
//! impl ConversionProgressCallback for PrintProgress {
//!     fn on_progress(&self, percent: u8) {
//!         eprintln!("{percent}%");
//!     }
//! }
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(Arc::new(PrintProgress))
//!     .build()
//!     .unwrap();
//! ```

use crate::error::Pdf2PptxError;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::warn;

/// Called by the conversion pipeline as it processes each page.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Implementations must be `Send + Sync` because the
/// async entry points run the pipeline on a blocking worker thread.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once after the document is loaded, before any page is rendered.
    fn on_conversion_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called just before a page is rasterised.
    ///
    /// # Arguments
    /// * `page_num`    — 1-indexed page number
    /// * `total_pages` — total pages in the document
    fn on_page_start(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called after each appended slide with `round(100 * done / total)`.
    ///
    /// The sequence is non-decreasing and ends at exactly 100.
    fn on_progress(&self, percent: u8) {
        let _ = percent;
    }

    /// Called after a page's slide was appended.
    fn on_page_complete(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called once after the deck was serialized.
    ///
    /// # Arguments
    /// * `total_slides` — slides in the finished deck
    /// * `deck_bytes`   — size of the serialized package
    fn on_conversion_complete(&self, total_slides: usize, deck_bytes: usize) {
        let _ = (total_slides, deck_bytes);
    }

    /// Called once when the conversion reaches its failed terminal state.
    fn on_conversion_failed(&self, error: &Pdf2PptxError) {
        let _ = error;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;

/// Completion percentage after `completed` of `total` pages, rounded half up.
pub fn percentage(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let completed = completed.min(total) as u64;
    let total = total as u64;
    ((200 * completed + total) / (2 * total)) as u8
}

/// Pipeline-side wrapper that shields the loop from its observer.
pub(crate) struct ProgressReporter {
    callback: Option<ProgressCallback>,
}

impl ProgressReporter {
    pub(crate) fn new(callback: Option<ProgressCallback>) -> Self {
        Self { callback }
    }

    pub(crate) fn conversion_start(&self, total_pages: usize) {
        self.notify("on_conversion_start", |cb| cb.on_conversion_start(total_pages));
    }

    pub(crate) fn page_start(&self, page_num: usize, total_pages: usize) {
        self.notify("on_page_start", |cb| cb.on_page_start(page_num, total_pages));
    }

    /// Report one completed page; returns the percentage that was emitted.
    pub(crate) fn page_complete(&self, page_num: usize, total_pages: usize) -> u8 {
        let percent = percentage(page_num, total_pages);
        self.notify("on_progress", |cb| cb.on_progress(percent));
        self.notify("on_page_complete", |cb| {
            cb.on_page_complete(page_num, total_pages)
        });
        percent
    }

    pub(crate) fn conversion_complete(&self, total_slides: usize, deck_bytes: usize) {
        self.notify("on_conversion_complete", |cb| {
            cb.on_conversion_complete(total_slides, deck_bytes)
        });
    }

    pub(crate) fn conversion_failed(&self, error: &Pdf2PptxError) {
        self.notify("on_conversion_failed", |cb| cb.on_conversion_failed(error));
    }

    fn notify(&self, event: &str, f: impl FnOnce(&dyn ConversionProgressCallback)) {
        let Some(cb) = self.callback.as_deref() else {
            return;
        };
        if catch_unwind(AssertUnwindSafe(|| f(cb))).is_err() {
            warn!("Progress observer panicked in {event}; continuing conversion");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recording {
        percents: Mutex<Vec<u8>>,
        completes: AtomicUsize,
    }

    impl ConversionProgressCallback for Recording {
        fn on_progress(&self, percent: u8) {
            self.percents.lock().unwrap().push(percent);
        }

        fn on_page_complete(&self, _page_num: usize, _total_pages: usize) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct Panicking;

    impl ConversionProgressCallback for Panicking {
        fn on_progress(&self, _percent: u8) {
            panic!("observer bug");
        }
    }

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(3, 3), 100);
        assert_eq!(percentage(1, 8), 13); // 12.5 rounds up
        assert_eq!(percentage(1, 200), 1); // 0.5 rounds up
        assert_eq!(percentage(0, 5), 0);
    }

    #[test]
    fn percentage_is_non_decreasing_and_ends_at_100() {
        for total in 1..=64 {
            let seq: Vec<u8> = (1..=total).map(|i| percentage(i, total)).collect();
            assert!(seq.windows(2).all(|w| w[0] <= w[1]), "total={total}");
            assert_eq!(*seq.last().unwrap(), 100);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_conversion_start(5);
        cb.on_page_start(1, 5);
        cb.on_progress(20);
        cb.on_page_complete(1, 5);
        cb.on_conversion_complete(5, 1024);
        cb.on_conversion_failed(&Pdf2PptxError::EmptyDeck);
    }

    #[test]
    fn reporter_emits_percentages() {
        let rec = Arc::new(Recording::default());
        let reporter = ProgressReporter::new(Some(rec.clone()));
        for page in 1..=3 {
            reporter.page_complete(page, 3);
        }
        assert_eq!(*rec.percents.lock().unwrap(), vec![33, 67, 100]);
        assert_eq!(rec.completes.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn reporter_survives_panicking_observer() {
        let reporter = ProgressReporter::new(Some(Arc::new(Panicking)));
        assert_eq!(reporter.page_complete(1, 2), 50);
        assert_eq!(reporter.page_complete(2, 2), 100);
    }

    #[test]
    fn reporter_without_callback_still_computes() {
        let reporter = ProgressReporter::new(None);
        assert_eq!(reporter.page_complete(1, 4), 25);
    }
}
