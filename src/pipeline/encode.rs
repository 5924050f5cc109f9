//! Image encoding: `DynamicImage` → PNG bytes for embedding in a slide.
//!
//! PNG is lossless, so rendered text stays crisp no matter how the deck is
//! later scaled. Alpha is flattened onto white first: PDF pages are opaque
//! paper, and a transparent background would show the slide master through.

use crate::config::PngCompression;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{DynamicImage, ImageEncoder, Rgb, RgbImage};
use tracing::debug;

/// Encode a rasterised page as PNG bytes.
pub fn encode_png(img: &DynamicImage, level: PngCompression) -> Result<Vec<u8>, image::ImageError> {
    let rgb = flatten_on_white(img);

    let (compression, filter) = match level {
        PngCompression::Fast => (CompressionType::Fast, FilterType::NoFilter),
        PngCompression::Default => (CompressionType::Default, FilterType::Adaptive),
        PngCompression::Best => (CompressionType::Best, FilterType::Adaptive),
    };

    let mut buf = Vec::new();
    PngEncoder::new_with_quality(&mut buf, compression, filter).write_image(
        rgb.as_raw(),
        rgb.width(),
        rgb.height(),
        image::ExtendedColorType::Rgb8,
    )?;

    debug!("Encoded image → {} bytes PNG", buf.len());
    Ok(buf)
}

fn flatten_on_white(img: &DynamicImage) -> RgbImage {
    let rgba = img.to_rgba8();
    let mut out = RgbImage::new(rgba.width(), rgba.height());
    for (dst, src) in out.pixels_mut().zip(rgba.pixels()) {
        let a = src[3] as u32;
        let blend = |c: u8| ((c as u32 * a + 255 * (255 - a) + 127) / 255) as u8;
        *dst = Rgb([blend(src[0]), blend(src[1]), blend(src[2])]);
    }
    out
}
