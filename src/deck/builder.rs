//! The accumulating deck: an explicit state machine with guarded transitions.
//!
//! ```text
//! Uninitialized ──initialize──▶ Building ──finalize──▶ Finalized
//!                                  │ ▲
//!                                  └─┘ append_slide
//! ```
//!
//! Every call that does not match the current state fails with
//! [`Pdf2PptxError::State`] and leaves the deck untouched. Mutation goes
//! through `&mut self`, so the builder cannot be shared between concurrent
//! page cycles in the first place.

use crate::deck::pptx;
use crate::error::Pdf2PptxError;
use crate::pipeline::geometry::SlideCanvasSize;
use crate::pipeline::raster::RasterImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Package-level properties written to `docProps/core.xml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeckProperties {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
}

/// One image-backed slide. Always positioned at the origin and sized to the
/// deck canvas.
#[derive(Debug, Clone)]
pub struct Slide {
    image: RasterImage,
    size: SlideCanvasSize,
}

impl Slide {
    pub fn image(&self) -> &RasterImage {
        &self.image
    }

    /// Offset from the top-left corner of the canvas, in inches.
    pub fn position(&self) -> (f64, f64) {
        (0.0, 0.0)
    }

    pub fn size(&self) -> SlideCanvasSize {
        self.size
    }
}

/// Lifecycle of a [`DeckBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckPhase {
    Uninitialized,
    Building,
    Finalized,
}

#[derive(Debug)]
enum DeckState {
    Uninitialized,
    Building {
        canvas: SlideCanvasSize,
        slides: Vec<Slide>,
    },
    Finalized,
}

/// Accumulates slides in page order and serializes them once.
#[derive(Debug)]
pub struct DeckBuilder {
    state: DeckState,
    properties: DeckProperties,
}

impl Default for DeckBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DeckBuilder {
    pub fn new() -> Self {
        Self::with_properties(DeckProperties::default())
    }

    pub fn with_properties(properties: DeckProperties) -> Self {
        Self {
            state: DeckState::Uninitialized,
            properties,
        }
    }

    pub fn phase(&self) -> DeckPhase {
        match self.state {
            DeckState::Uninitialized => DeckPhase::Uninitialized,
            DeckState::Building { .. } => DeckPhase::Building,
            DeckState::Finalized => DeckPhase::Finalized,
        }
    }

    pub fn canvas(&self) -> Option<SlideCanvasSize> {
        match &self.state {
            DeckState::Building { canvas, .. } => Some(*canvas),
            _ => None,
        }
    }

    /// Slides appended so far, in page order. Empty once finalized.
    pub fn slides(&self) -> &[Slide] {
        match &self.state {
            DeckState::Building { slides, .. } => slides,
            _ => &[],
        }
    }

    pub fn slide_count(&self) -> usize {
        self.slides().len()
    }

    /// Fix the canvas size for every slide of this deck.
    pub fn initialize(&mut self, canvas: SlideCanvasSize) -> Result<(), Pdf2PptxError> {
        match self.state {
            DeckState::Uninitialized => {}
            DeckState::Building { .. } => {
                return Err(Pdf2PptxError::state("deck canvas is already initialized"))
            }
            DeckState::Finalized => {
                return Err(Pdf2PptxError::state("deck is already finalized"))
            }
        }
        if !canvas.is_valid() {
            return Err(Pdf2PptxError::state(format!(
                "canvas size must be positive, got {}x{} in",
                canvas.width, canvas.height
            )));
        }
        if !canvas.within_powerpoint_limits() {
            warn!(
                "Canvas {:.2}x{:.2} in is outside PowerPoint's 1–56 in slide range; keeping it",
                canvas.width, canvas.height
            );
        }
        debug!("Deck canvas fixed at {:.3}x{:.3} in", canvas.width, canvas.height);
        self.state = DeckState::Building {
            canvas,
            slides: Vec::new(),
        };
        Ok(())
    }

    /// Append one slide at the end of the sequence.
    pub fn append_slide(&mut self, image: RasterImage) -> Result<(), Pdf2PptxError> {
        match &mut self.state {
            DeckState::Building { canvas, slides } => {
                slides.push(Slide {
                    image,
                    size: *canvas,
                });
                Ok(())
            }
            DeckState::Uninitialized => Err(Pdf2PptxError::state(
                "append_slide called before initialize",
            )),
            DeckState::Finalized => Err(Pdf2PptxError::state(
                "append_slide called after finalize",
            )),
        }
    }

    /// Serialize the deck. The builder accepts no further calls afterwards.
    pub fn finalize(&mut self) -> Result<Vec<u8>, Pdf2PptxError> {
        match std::mem::replace(&mut self.state, DeckState::Finalized) {
            DeckState::Finalized => Err(Pdf2PptxError::state("deck is already finalized")),
            DeckState::Uninitialized => Err(Pdf2PptxError::EmptyDeck),
            DeckState::Building { slides, .. } if slides.is_empty() => {
                Err(Pdf2PptxError::EmptyDeck)
            }
            DeckState::Building { canvas, slides } => {
                pptx::write_package(&canvas, &slides, &self.properties)
            }
        }
    }
}
