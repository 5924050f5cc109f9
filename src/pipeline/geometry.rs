//! Viewport pixels → physical slide size.
//!
//! The deck canvas is derived once, from page 1, and shared by every slide.
//! Later pages with a different aspect ratio are stretched to fill it.

use crate::pipeline::raster::Viewport;
use serde::{Deserialize, Serialize};

/// PDF length-units per inch.
pub const POINTS_PER_INCH: f64 = 72.0;

/// PresentationML English Metric Units per inch.
pub const EMU_PER_INCH: f64 = 914_400.0;

/// Smallest and largest slide edge PowerPoint will open (1 in and 56 in).
pub const MIN_SLIDE_EMU: i64 = 914_400;
pub const MAX_SLIDE_EMU: i64 = 51_206_400;

/// Physical slide dimensions in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlideCanvasSize {
    pub width: f64,
    pub height: f64,
}

impl SlideCanvasSize {
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Width in EMU, rounded to the nearest unit.
    pub fn width_emu(&self) -> i64 {
        inches_to_emu(self.width)
    }

    /// Height in EMU, rounded to the nearest unit.
    pub fn height_emu(&self) -> i64 {
        inches_to_emu(self.height)
    }

    /// Whether PowerPoint accepts this size without complaint.
    pub fn within_powerpoint_limits(&self) -> bool {
        let ok = |emu: i64| (MIN_SLIDE_EMU..=MAX_SLIDE_EMU).contains(&emu);
        ok(self.width_emu()) && ok(self.height_emu())
    }
}

/// `width = pixel_width / (72 * scale)`, likewise for height.
///
/// Pure: identical inputs give bit-identical outputs.
pub fn resolve_canvas(viewport: &Viewport, scale: f32) -> SlideCanvasSize {
    let divisor = POINTS_PER_INCH * scale as f64;
    SlideCanvasSize {
        width: viewport.pixel_width as f64 / divisor,
        height: viewport.pixel_height as f64 / divisor,
    }
}

fn inches_to_emu(inches: f64) -> i64 {
    (inches * EMU_PER_INCH).round() as i64
}
