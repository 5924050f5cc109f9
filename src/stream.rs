//! Streaming conversion API: observe a conversion as a stream of events.
//!
//! [`convert_stream`] starts the pipeline on a blocking worker and returns
//! immediately. Progress notifications are forwarded over an unbounded
//! channel; the stream always ends with exactly one
//! [`ConversionEvent::Finished`] carrying the terminal outcome.
//!
//! A progress callback already set on the config keeps receiving its own
//! notifications alongside the stream.

use crate::config::ConversionConfig;
use crate::convert::{convert_bytes_blocking, convert_with_loader};
use crate::error::Pdf2PptxError;
use crate::output::ConversionOutput;
use crate::pipeline::loader::DocumentLoader;
use crate::progress::{ConversionProgressCallback, ProgressCallback};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::Stream;
use tracing::info;

/// One observable step of a streaming conversion.
#[derive(Debug)]
pub enum ConversionEvent {
    /// The document was decoded.
    Started { total_pages: usize },
    /// A page is about to be rasterised (1-based).
    PageStarted { page_num: usize, total_pages: usize },
    /// Overall completion after the latest appended slide.
    Progress(u8),
    /// A page's slide was appended (1-based).
    PageCompleted { page_num: usize, total_pages: usize },
    /// Terminal outcome. Always the last event.
    Finished(Result<ConversionOutput, Pdf2PptxError>),
}

/// A boxed stream of conversion events.
pub type EventStream = Pin<Box<dyn Stream<Item = ConversionEvent> + Send>>;

/// Convert an in-memory PDF, streaming events as pages complete.
///
/// Must be called from within a tokio runtime.
///
/// # Example
/// ```rust,no_run
/// use pdf2pptx::{convert_stream, ConversionConfig, ConversionEvent};
/// use futures::StreamExt;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let bytes = std::fs::read("slides.pdf")?;
/// let mut events = convert_stream(bytes, &ConversionConfig::default());
/// while let Some(event) = events.next().await {
///     match event {
///         ConversionEvent::Progress(p) => eprintln!("{p}%"),
///         ConversionEvent::Finished(result) => {
///             std::fs::write("slides.pptx", result?.pptx)?;
///         }
///         _ => {}
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub fn convert_stream(bytes: Vec<u8>, config: &ConversionConfig) -> EventStream {
    spawn_conversion(config, move |cfg| convert_bytes_blocking(&bytes, cfg))
}

/// [`convert_stream`] through an arbitrary loader.
pub fn convert_stream_with_loader<L>(
    loader: L,
    bytes: Vec<u8>,
    config: &ConversionConfig,
) -> EventStream
where
    L: DocumentLoader + Send + 'static,
{
    spawn_conversion(config, move |cfg| convert_with_loader(&loader, &bytes, cfg))
}

fn spawn_conversion<F>(config: &ConversionConfig, job: F) -> EventStream
where
    F: FnOnce(&ConversionConfig) -> Result<ConversionOutput, Pdf2PptxError> + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();

    let mut config = config.clone();
    let downstream = config.progress_callback.take();
    config.progress_callback = Some(Arc::new(ChannelForwarder {
        tx: tx.clone(),
        downstream,
    }));

    tokio::task::spawn_blocking(move || {
        let result = catch_unwind(AssertUnwindSafe(|| job(&config))).unwrap_or_else(|_| {
            Err(Pdf2PptxError::Internal(
                "conversion worker panicked".to_string(),
            ))
        });
        info!("Streaming conversion finished (ok = {})", result.is_ok());
        // The receiver may already be gone; nobody is left to tell.
        let _ = tx.send(ConversionEvent::Finished(result));
    });

    Box::pin(UnboundedReceiverStream::new(rx))
}

/// Turns progress callbacks into channel events.
struct ChannelForwarder {
    tx: mpsc::UnboundedSender<ConversionEvent>,
    downstream: Option<ProgressCallback>,
}

impl ChannelForwarder {
    fn send(&self, event: ConversionEvent) {
        let _ = self.tx.send(event);
    }
}

impl ConversionProgressCallback for ChannelForwarder {
    fn on_conversion_start(&self, total_pages: usize) {
        self.send(ConversionEvent::Started { total_pages });
        if let Some(cb) = &self.downstream {
            cb.on_conversion_start(total_pages);
        }
    }

    fn on_page_start(&self, page_num: usize, total_pages: usize) {
        self.send(ConversionEvent::PageStarted {
            page_num,
            total_pages,
        });
        if let Some(cb) = &self.downstream {
            cb.on_page_start(page_num, total_pages);
        }
    }

    fn on_progress(&self, percent: u8) {
        self.send(ConversionEvent::Progress(percent));
        if let Some(cb) = &self.downstream {
            cb.on_progress(percent);
        }
    }

    fn on_page_complete(&self, page_num: usize, total_pages: usize) {
        self.send(ConversionEvent::PageCompleted {
            page_num,
            total_pages,
        });
        if let Some(cb) = &self.downstream {
            cb.on_page_complete(page_num, total_pages);
        }
    }

    fn on_conversion_complete(&self, total_slides: usize, deck_bytes: usize) {
        if let Some(cb) = &self.downstream {
            cb.on_conversion_complete(total_slides, deck_bytes);
        }
    }

    fn on_conversion_failed(&self, error: &Pdf2PptxError) {
        if let Some(cb) = &self.downstream {
            cb.on_conversion_failed(error);
        }
    }
}
