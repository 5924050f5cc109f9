//! Page rasterisation at a fixed oversampling scale.
//!
//! ## Why a fixed 2.0?
//!
//! Doubling linear resolution quadruples the pixel count. 2.0 keeps text
//! crisp when a slide is projected or zoomed while bounding memory per page,
//! so the scale is a constant of the pipeline rather than a caller knob.

use crate::config::PngCompression;
use crate::error::Pdf2PptxError;
use crate::pipeline::encode;
use crate::pipeline::loader::{PageSize, SourceDocument};
use image::imageops::FilterType;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Oversampling factor applied to every page's intrinsic size.
pub const RENDER_SCALE: f32 = 2.0;

/// Pixel-space rendering target for one page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub scale: f32,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

impl Viewport {
    /// `ceil(intrinsic * scale)` on both axes, never below one pixel.
    pub fn for_page(size: PageSize, scale: f32) -> Self {
        let px = |points: f32| ((points as f64) * (scale as f64)).ceil().max(1.0) as u32;
        Self {
            scale,
            pixel_width: px(size.width),
            pixel_height: px(size.height),
        }
    }
}

/// A page's pixels, PNG-encoded and ready for embedding.
#[derive(Debug, Clone)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
}

/// Rasterise one page (0-based `index`) and encode it.
///
/// The working bitmap lives only for the duration of this call.
pub fn rasterize_page(
    document: &dyn SourceDocument,
    index: usize,
    compression: PngCompression,
) -> Result<(Viewport, RasterImage), Pdf2PptxError> {
    let page_num = index + 1;
    let size = document.page_size(index)?;
    if !size.is_valid() {
        return Err(Pdf2PptxError::RenderFailed {
            page: page_num,
            detail: format!("invalid page size {}x{} pt", size.width, size.height),
        });
    }

    let viewport = Viewport::for_page(size, RENDER_SCALE);
    let bitmap = document.rasterize(index, &viewport)?;
    let bitmap = fit_to_viewport(bitmap, &viewport, page_num);

    let png = encode::encode_png(&bitmap, compression).map_err(|e| {
        Pdf2PptxError::RenderFailed {
            page: page_num,
            detail: format!("Image encoding failed: {e}"),
        }
    })?;

    debug!(
        "Rendered page {} → {}x{} px ({} bytes PNG)",
        page_num,
        viewport.pixel_width,
        viewport.pixel_height,
        png.len()
    );

    Ok((
        viewport,
        RasterImage {
            width: viewport.pixel_width,
            height: viewport.pixel_height,
            png,
        },
    ))
}

/// Backends may round the target size differently; the slide image must
/// match the viewport exactly.
fn fit_to_viewport(bitmap: DynamicImage, viewport: &Viewport, page_num: usize) -> DynamicImage {
    if bitmap.width() == viewport.pixel_width && bitmap.height() == viewport.pixel_height {
        return bitmap;
    }
    warn!(
        "Page {} rendered at {}x{} px, resizing to viewport {}x{}",
        page_num,
        bitmap.width(),
        bitmap.height(),
        viewport.pixel_width,
        viewport.pixel_height
    );
    bitmap.resize_exact(viewport.pixel_width, viewport.pixel_height, FilterType::Triangle)
}
