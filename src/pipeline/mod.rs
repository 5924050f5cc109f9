//! Pipeline stages for PDF-to-PPTX conversion.
//!
//! Each submodule implements one step; [`runner`] drives them in order.
//!
//! ## Data Flow
//!
//! ```text
//! loader ──▶ raster ──▶ encode ──▶ geometry ──▶ deck
//! (bytes)    (viewport) (PNG)      (canvas)     (slides → PPTX)
//! ```
//!
//! 1. [`loader`]   — decode the input buffer into a paginated [`loader::SourceDocument`]
//!    ([`pdfium`] provides the production backend)
//! 2. [`raster`]   — render one page at [`raster::RENDER_SCALE`]
//! 3. [`encode`]   — lossless PNG for embedding
//! 4. [`geometry`] — derive the deck canvas from page 1's viewport
//! 5. [`runner`]   — the sequential state machine tying it together

pub mod encode;
pub mod geometry;
pub mod loader;
pub mod pdfium;
pub mod raster;
pub mod runner;

pub use runner::{Pipeline, PipelineState};
