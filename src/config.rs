//! Configuration types for PDF-to-PPTX conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The oversampling scale is deliberately
//! absent: every page is rasterised at [`crate::pipeline::raster::RENDER_SCALE`].

use crate::cancel::CancelHandle;
use crate::error::Pdf2PptxError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Configuration for a PDF-to-PPTX conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf2pptx::{ConversionConfig, PngCompression};
///
/// let config = ConversionConfig::builder()
///     .title("Quarterly review")
///     .png_compression(PngCompression::Best)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone, Default)]
pub struct ConversionConfig {
    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Deck title written to the package properties.
    /// If None, the source document's title (if any) is used.
    pub title: Option<String>,

    /// Deck author written to the package properties.
    /// If None, the source document's author (if any) is used.
    pub author: Option<String>,

    /// PNG compression effort for the embedded page images. Default: [`PngCompression::Default`].
    ///
    /// Images are always lossless; this only trades encode time for deck size.
    pub png_compression: PngCompression,

    /// Explicit path to the pdfium shared library.
    /// If None, `PDFIUM_LIB_PATH` and the usual search locations are tried.
    pub pdfium_lib_path: Option<PathBuf>,

    /// Observer for per-page progress events.
    pub progress_callback: Option<ProgressCallback>,

    /// Handle the caller can use to abandon the conversion between pages.
    pub cancel: CancelHandle,
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("title", &self.title)
            .field("author", &self.author)
            .field("png_compression", &self.png_compression)
            .field("pdfium_lib_path", &self.pdfium_lib_path)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.config.title = Some(title.into());
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.config.author = Some(author.into());
        self
    }

    pub fn png_compression(mut self, level: PngCompression) -> Self {
        self.config.png_compression = level;
        self
    }

    pub fn pdfium_lib_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_lib_path = Some(path.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    pub fn cancel_handle(mut self, handle: CancelHandle) -> Self {
        self.config.cancel = handle;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Pdf2PptxError> {
        let c = &self.config;
        for (field, value) in [("title", &c.title), ("author", &c.author)] {
            if let Some(v) = value {
                if v.chars().any(|ch| ch.is_control() && !matches!(ch, '\t' | '\n' | '\r')) {
                    return Err(Pdf2PptxError::InvalidConfig(format!(
                        "{field} contains control characters that cannot be stored in the deck"
                    )));
                }
            }
        }
        if let Some(ref path) = c.pdfium_lib_path {
            if !path.exists() {
                return Err(Pdf2PptxError::InvalidConfig(format!(
                    "pdfium library not found at '{}'",
                    path.display()
                )));
            }
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// PNG encoder effort for embedded page images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PngCompression {
    /// Fastest encode, largest deck.
    Fast,
    /// Balanced (default).
    #[default]
    Default,
    /// Smallest deck, slowest encode.
    Best,
}
