//! pdfium-backed [`DocumentLoader`].
//!
//! ## Binding
//!
//! pdfium is a C++ shared library loaded at runtime. [`bind_pdfium`] tries,
//! in order (first hit wins):
//!
//! 1. an explicit path (`--pdfium-lib` / [`crate::ConversionConfig::pdfium_lib_path`])
//! 2. `PDFIUM_LIB_PATH`
//! 3. the directory containing the running executable
//! 4. the current working directory
//! 5. the system library search path
//!
//! ## Threading
//!
//! pdfium keeps thread-local state and is not async-safe. Every call in this
//! module is blocking; the async entry points wrap the whole pipeline in
//! `tokio::task::spawn_blocking`.

use crate::error::Pdf2PptxError;
use crate::output::DocumentMetadata;
use crate::pipeline::loader::{DocumentLoader, PageSize, SourceDocument};
use crate::pipeline::raster::Viewport;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming an existing pdfium library.
pub const PDFIUM_LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Bind to a pdfium library, searching the usual locations.
pub fn bind_pdfium(explicit: Option<&Path>) -> Result<Pdfium, Pdf2PptxError> {
    let mut attempts: Vec<String> = Vec::new();

    for candidate in library_candidates(explicit) {
        if !candidate.exists() {
            continue;
        }
        match Pdfium::bind_to_library(&candidate) {
            Ok(bindings) => {
                debug!("Bound pdfium from {}", candidate.display());
                return Ok(Pdfium::new(bindings));
            }
            Err(e) => attempts.push(format!("{}: {e}", candidate.display())),
        }
    }

    match Pdfium::bind_to_system_library() {
        Ok(bindings) => {
            debug!("Bound pdfium from the system library path");
            Ok(Pdfium::new(bindings))
        }
        Err(e) => {
            attempts.push(format!("system library: {e}"));
            Err(Pdf2PptxError::PdfiumBindingFailed(attempts.join("; ")))
        }
    }
}

fn library_candidates(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut out = Vec::new();
    if let Some(p) = explicit {
        out.push(p.to_path_buf());
    }
    if let Ok(p) = std::env::var(PDFIUM_LIB_PATH_ENV) {
        if !p.is_empty() {
            out.push(PathBuf::from(p));
        }
    }
    if let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        out.push(Pdfium::pdfium_platform_library_name_at_path(&dir));
    }
    out.push(Pdfium::pdfium_platform_library_name_at_path("./"));
    out
}

/// Loads documents from memory through a bound pdfium instance.
pub struct PdfiumLoader {
    pdfium: Pdfium,
}

impl PdfiumLoader {
    pub fn new(pdfium: Pdfium) -> Self {
        Self { pdfium }
    }

    /// Bind pdfium (see [`bind_pdfium`]) and wrap it.
    pub fn bind(explicit: Option<&Path>) -> Result<Self, Pdf2PptxError> {
        bind_pdfium(explicit).map(Self::new)
    }
}

impl DocumentLoader for PdfiumLoader {
    fn load<'a>(
        &'a self,
        bytes: &'a [u8],
        password: Option<&str>,
    ) -> Result<Box<dyn SourceDocument + 'a>, Pdf2PptxError> {
        let document = self
            .pdfium
            .load_pdf_from_byte_slice(bytes, password)
            .map_err(|e| classify_load_error(&format!("{e:?}"), password.is_some()))?;

        info!("PDF loaded: {} pages", document.pages().len());
        Ok(Box::new(PdfiumDocument { document }))
    }
}

/// pdfium reports password problems through its generic error type.
fn classify_load_error(debug_repr: &str, had_password: bool) -> Pdf2PptxError {
    if debug_repr.contains("Password") || debug_repr.contains("password") {
        if had_password {
            Pdf2PptxError::WrongPassword
        } else {
            Pdf2PptxError::PasswordRequired
        }
    } else {
        Pdf2PptxError::CorruptDocument {
            detail: debug_repr.to_string(),
        }
    }
}

struct PdfiumDocument<'a> {
    document: PdfDocument<'a>,
}

impl<'a> PdfiumDocument<'a> {
    fn page(&self, index: usize) -> Result<PdfPage<'a>, Pdf2PptxError> {
        self.document
            .pages()
            .get(index as u16)
            .map_err(|e| Pdf2PptxError::RenderFailed {
                page: index + 1,
                detail: format!("{e:?}"),
            })
    }
}

impl SourceDocument for PdfiumDocument<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn page_size(&self, index: usize) -> Result<PageSize, Pdf2PptxError> {
        let page = self.page(index)?;
        Ok(PageSize::new(page.width().value, page.height().value))
    }

    fn rasterize(&self, index: usize, viewport: &Viewport) -> Result<DynamicImage, Pdf2PptxError> {
        let page = self.page(index)?;

        let render_config = PdfRenderConfig::new()
            .set_target_width(viewport.pixel_width as i32)
            .set_target_height(viewport.pixel_height as i32)
            .rotate_if_landscape(PdfPageRenderRotation::None, false);

        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|e| Pdf2PptxError::RenderFailed {
                page: index + 1,
                detail: format!("{e:?}"),
            })?;

        Ok(bitmap.as_image())
    }

    fn metadata(&self) -> DocumentMetadata {
        let metadata = self.document.metadata();

        let get_meta = |tag: PdfDocumentMetadataTagType| -> Option<String> {
            metadata.get(tag).and_then(|t| {
                let v = t.value().to_string();
                if v.is_empty() {
                    None
                } else {
                    Some(v)
                }
            })
        };

        DocumentMetadata {
            title: get_meta(PdfDocumentMetadataTagType::Title),
            author: get_meta(PdfDocumentMetadataTagType::Author),
            subject: get_meta(PdfDocumentMetadataTagType::Subject),
            creator: get_meta(PdfDocumentMetadataTagType::Creator),
            producer: get_meta(PdfDocumentMetadataTagType::Producer),
            page_count: self.page_count(),
            pdf_version: format!("{:?}", self.document.version()),
        }
    }
}
