//! Result types returned by the conversion entry points.

use crate::pipeline::geometry::SlideCanvasSize;
use serde::{Deserialize, Serialize};

/// Descriptive metadata read from the source document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub page_count: usize,
    /// Backend-reported version string, e.g. `Pdf1_7`. Empty if unknown.
    pub pdf_version: String,
}

/// Timing and size figures for one conversion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversionStats {
    pub total_pages: usize,
    /// Wall-clock time spent rasterising and PNG-encoding pages.
    pub render_duration_ms: u64,
    /// Wall-clock time spent writing the package.
    pub serialize_duration_ms: u64,
    pub total_duration_ms: u64,
    /// Size of the serialized deck in bytes.
    pub deck_bytes: usize,
}

/// A finished deck.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// The serialized PPTX package.
    #[serde(skip)]
    pub pptx: Vec<u8>,
    pub slide_count: usize,
    /// Canvas shared by every slide, derived from page 1.
    pub canvas: SlideCanvasSize,
    pub metadata: DocumentMetadata,
    pub stats: ConversionStats,
}
