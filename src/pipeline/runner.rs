//! The page-to-slide pipeline as an explicit, single-use state machine.
//!
//! ```text
//! Idle → Loading → ( Rasterizing → Resolving[page 1] → Appending → Reporting )*
//!      → Finalizing → Completed
//!                   ↘ Failed(kind)   (from any state except Idle / Completed)
//! ```
//!
//! Pages are processed strictly one after another: page *i+1* is not
//! rasterised until page *i*'s slide is appended and reported. The
//! [`DeckBuilder`] is owned by the loop and only mutated through it.

use crate::config::ConversionConfig;
use crate::deck::{DeckBuilder, DeckProperties};
use crate::error::{ErrorKind, Pdf2PptxError};
use crate::output::{ConversionOutput, ConversionStats, DocumentMetadata};
use crate::pipeline::geometry::{self, SlideCanvasSize};
use crate::pipeline::loader::DocumentLoader;
use crate::pipeline::raster::{self, RENDER_SCALE};
use crate::progress::ProgressReporter;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Where a pipeline run currently is. Page numbers are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Loading,
    Rasterizing { page: usize },
    Resolving,
    Appending { page: usize },
    Reporting { page: usize },
    Finalizing,
    Completed,
    Failed(ErrorKind),
}

impl PipelineState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Completed | PipelineState::Failed(_))
    }
}

/// One conversion. Create a fresh instance per document; a used instance
/// refuses to run again.
pub struct Pipeline<'a, L: DocumentLoader + ?Sized> {
    loader: &'a L,
    config: &'a ConversionConfig,
    state: PipelineState,
    history: Vec<PipelineState>,
}

impl<'a, L: DocumentLoader + ?Sized> Pipeline<'a, L> {
    pub fn new(loader: &'a L, config: &'a ConversionConfig) -> Self {
        Self {
            loader,
            config,
            state: PipelineState::Idle,
            history: vec![PipelineState::Idle],
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Every state entered so far, starting with `Idle`.
    pub fn history(&self) -> &[PipelineState] {
        &self.history
    }

    /// Convert `bytes` into a deck. Produces exactly one terminal outcome.
    pub fn run(&mut self, bytes: &[u8]) -> Result<ConversionOutput, Pdf2PptxError> {
        if self.state != PipelineState::Idle {
            return Err(Pdf2PptxError::state(format!(
                "pipeline already ran (state {:?}); create a new pipeline per conversion",
                self.state
            )));
        }

        let reporter = ProgressReporter::new(self.config.progress_callback.clone());
        match self.execute(bytes, &reporter) {
            Ok(output) => {
                self.transition(PipelineState::Completed);
                reporter.conversion_complete(output.slide_count, output.pptx.len());
                Ok(output)
            }
            Err(e) => {
                warn!("Conversion failed ({}): {}", e.kind(), e);
                self.transition(PipelineState::Failed(e.kind()));
                reporter.conversion_failed(&e);
                Err(e)
            }
        }
    }

    fn execute(
        &mut self,
        bytes: &[u8],
        reporter: &ProgressReporter,
    ) -> Result<ConversionOutput, Pdf2PptxError> {
        let total_start = Instant::now();
        let loader = self.loader;
        let config = self.config;

        // ── Load ─────────────────────────────────────────────────────────
        self.transition(PipelineState::Loading);
        let document = loader.load(bytes, config.password.as_deref())?;
        let total_pages = document.page_count();
        let metadata = document.metadata();
        info!("Converting {} pages", total_pages);
        reporter.conversion_start(total_pages);

        let mut deck = DeckBuilder::with_properties(deck_properties(config, &metadata));
        let mut canvas: Option<SlideCanvasSize> = None;
        let mut render_ms = 0u64;

        // ── Page cycles ──────────────────────────────────────────────────
        for index in 0..total_pages {
            let page = index + 1;
            check_cancelled(config, index)?;
            reporter.page_start(page, total_pages);

            self.transition(PipelineState::Rasterizing { page });
            let render_start = Instant::now();
            let (viewport, image) =
                raster::rasterize_page(document.as_ref(), index, config.png_compression)?;
            render_ms += render_start.elapsed().as_millis() as u64;

            if canvas.is_none() {
                self.transition(PipelineState::Resolving);
                let resolved = geometry::resolve_canvas(&viewport, RENDER_SCALE);
                deck.initialize(resolved)?;
                canvas = Some(resolved);
            }

            self.transition(PipelineState::Appending { page });
            deck.append_slide(image)?;

            self.transition(PipelineState::Reporting { page });
            let percent = reporter.page_complete(page, total_pages);
            debug!("Page {}/{} appended ({}%)", page, total_pages, percent);
        }

        // ── Finalize ─────────────────────────────────────────────────────
        check_cancelled(config, total_pages)?;
        self.transition(PipelineState::Finalizing);
        let serialize_start = Instant::now();
        let pptx = deck.finalize()?;
        let serialize_ms = serialize_start.elapsed().as_millis() as u64;
        drop(document);

        let canvas = canvas.ok_or_else(|| {
            Pdf2PptxError::Internal("deck finalized without a canvas".to_string())
        })?;

        let stats = ConversionStats {
            total_pages,
            render_duration_ms: render_ms,
            serialize_duration_ms: serialize_ms,
            total_duration_ms: total_start.elapsed().as_millis() as u64,
            deck_bytes: pptx.len(),
        };

        info!(
            "Conversion complete: {} slides at {:.2}x{:.2} in, {} bytes, {}ms total",
            total_pages, canvas.width, canvas.height, stats.deck_bytes, stats.total_duration_ms
        );

        Ok(ConversionOutput {
            pptx,
            slide_count: total_pages,
            canvas,
            metadata,
            stats,
        })
    }

    fn transition(&mut self, next: PipelineState) {
        debug!("Pipeline {:?} → {:?}", self.state, next);
        self.state = next;
        self.history.push(next);
    }
}

fn check_cancelled(config: &ConversionConfig, completed_pages: usize) -> Result<(), Pdf2PptxError> {
    if config.cancel.is_cancelled() {
        info!("Cancellation requested after {} page(s)", completed_pages);
        return Err(Pdf2PptxError::Cancelled { completed_pages });
    }
    Ok(())
}

/// Explicit config wins; otherwise fall back to the source document's own metadata.
fn deck_properties(config: &ConversionConfig, metadata: &DocumentMetadata) -> DeckProperties {
    DeckProperties {
        title: config.title.clone().or_else(|| metadata.title.clone()),
        author: config.author.clone().or_else(|| metadata.author.clone()),
        subject: metadata.subject.clone(),
    }
}
