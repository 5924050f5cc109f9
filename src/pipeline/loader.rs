//! Document loading seam.
//!
//! The pipeline never talks to a PDF engine directly. It asks a
//! [`DocumentLoader`] for a [`SourceDocument`] and drives pages through that
//! trait object, so the rendering backend (pdfium in production, an
//! in-memory fake in tests) can be swapped without touching the loop.

use crate::error::Pdf2PptxError;
use crate::output::DocumentMetadata;
use crate::pipeline::raster::Viewport;
use image::DynamicImage;

/// Intrinsic page size in source length-units (PDF points, 72 per inch).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// US Letter, 612 × 792 pt.
    pub const LETTER: PageSize = PageSize {
        width: 612.0,
        height: 792.0,
    };

    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// A decoded, paginated document. Owned by exactly one pipeline run.
///
/// Page indices are 0-based; error messages use 1-based page numbers.
pub trait SourceDocument {
    fn page_count(&self) -> usize;

    /// Intrinsic size of page `index`.
    fn page_size(&self, index: usize) -> Result<PageSize, Pdf2PptxError>;

    /// Render page `index` into a bitmap of `viewport`'s pixel dimensions.
    ///
    /// Backends should honour the viewport exactly; the rasteriser corrects
    /// off-by-one rounding in the returned bitmap.
    fn rasterize(&self, index: usize, viewport: &Viewport) -> Result<DynamicImage, Pdf2PptxError>;

    /// Descriptive metadata. Backends without metadata report only the page count.
    fn metadata(&self) -> DocumentMetadata {
        DocumentMetadata {
            page_count: self.page_count(),
            ..DocumentMetadata::default()
        }
    }
}

/// Decodes a raw byte buffer into a [`SourceDocument`].
pub trait DocumentLoader {
    /// Fails with a decode-kind [`Pdf2PptxError`] when `bytes` is not a
    /// structurally valid document.
    fn load<'a>(
        &'a self,
        bytes: &'a [u8],
        password: Option<&str>,
    ) -> Result<Box<dyn SourceDocument + 'a>, Pdf2PptxError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_size_validity() {
        assert!(PageSize::LETTER.is_valid());
        assert!(!PageSize::new(0.0, 792.0).is_valid());
        assert!(!PageSize::new(612.0, -1.0).is_valid());
        assert!(!PageSize::new(f32::NAN, 792.0).is_valid());
    }
}
