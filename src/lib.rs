//! # pdf2pptx
//!
//! Convert PDF documents into PowerPoint decks, one image-backed slide per
//! page.
//!
//! Every page is rasterised at a fixed 2× oversampling scale, PNG-encoded
//! and placed full-bleed on its own slide. The deck's slide size is taken
//! from the first page, so a Letter-sized PDF becomes an 8.5 × 11 in deck.
//! Text is not extracted: slides are pictures of the pages.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF bytes
//!  │
//!  ├─ 1. Load      decode via pdfium (in memory, no temp files)
//!  ├─ 2. Render    page i → bitmap at 2× (strictly one page at a time)
//!  ├─ 3. Encode    bitmap → lossless PNG
//!  ├─ 4. Canvas    page 1 fixes the slide size in inches
//!  ├─ 5. Append    slide i, then report round(100·i/N) %
//!  └─ 6. Finalize  serialize the PPTX package
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2pptx::{convert_to_file, ConversionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::builder().title("Board deck").build()?;
//!     let stats = convert_to_file("board.pdf", "board.pptx", &config).await?;
//!     eprintln!("{} slides in {}ms", stats.total_pages, stats.total_duration_ms);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2pptx` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdf2pptx = { version = "0.1", default-features = false }
//! ```
//!
//! ## pdfium
//!
//! Rendering needs the pdfium shared library at runtime. See
//! [`pipeline::pdfium::bind_pdfium`] for where it is looked up.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod cancel;
pub mod config;
pub mod convert;
pub mod deck;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod stream;

/// Application name written to `docProps/app.xml`.
pub const APPLICATION_NAME: &str = "pdf2pptx";

// ── Re-exports ───────────────────────────────────────────────────────────

pub use cancel::CancelHandle;
pub use config::{ConversionConfig, ConversionConfigBuilder, PngCompression};
pub use convert::{
    convert_bytes, convert_bytes_blocking, convert_file, convert_sync, convert_to_file,
    convert_with_loader, inspect, inspect_with_loader, output_path_for,
};
pub use deck::{DeckBuilder, DeckPhase, DeckProperties, Slide};
pub use error::{ErrorKind, Pdf2PptxError};
pub use output::{ConversionOutput, ConversionStats, DocumentMetadata};
pub use pipeline::geometry::SlideCanvasSize;
pub use pipeline::{Pipeline, PipelineState};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use stream::{convert_stream, convert_stream_with_loader, ConversionEvent, EventStream};
