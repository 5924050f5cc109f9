//! Eager (whole-document) conversion entry points.
//!
//! Every function here ends up in [`Pipeline::run`], on the calling thread
//! for the `_blocking` variants and on a `spawn_blocking` worker for the
//! async ones. Use [`crate::stream::convert_stream`] instead when you want
//! progress as a stream of events.

use crate::config::ConversionConfig;
use crate::error::Pdf2PptxError;
use crate::output::{ConversionOutput, ConversionStats, DocumentMetadata};
use crate::pipeline::loader::DocumentLoader;
use crate::pipeline::pdfium::PdfiumLoader;
use crate::pipeline::Pipeline;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Convert an in-memory PDF on the current thread.
///
/// Binds pdfium (see [`crate::pipeline::pdfium::bind_pdfium`]) for the
/// duration of the call.
pub fn convert_bytes_blocking(
    bytes: &[u8],
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2PptxError> {
    let loader = PdfiumLoader::bind(config.pdfium_lib_path.as_deref())?;
    convert_with_loader(&loader, bytes, config)
}

/// Convert `bytes` through an arbitrary [`DocumentLoader`].
pub fn convert_with_loader(
    loader: &dyn DocumentLoader,
    bytes: &[u8],
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2PptxError> {
    Pipeline::new(loader, config).run(bytes)
}

/// Convert an in-memory PDF to a PPTX deck.
///
/// This is the primary entry point for the library. pdfium is not
/// async-safe, so the whole pipeline runs on a blocking worker thread.
///
/// # Example
/// ```rust,no_run
/// use pdf2pptx::{convert_bytes, ConversionConfig};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let bytes = std::fs::read("slides.pdf")?;
/// let output = convert_bytes(bytes, &ConversionConfig::default()).await?;
/// std::fs::write("slides.pptx", &output.pptx)?;
/// # Ok(())
/// # }
/// ```
pub async fn convert_bytes(
    bytes: Vec<u8>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2PptxError> {
    let config = config.clone();
    tokio::task::spawn_blocking(move || convert_bytes_blocking(&bytes, &config))
        .await
        .map_err(|e| Pdf2PptxError::Internal(format!("conversion task panicked: {e}")))?
}

/// Read a PDF from disk and convert it.
pub async fn convert_file(
    input: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2PptxError> {
    let bytes = read_input(input.as_ref()).await?;
    convert_bytes(bytes, config).await
}

/// Convert a PDF file and write the deck to `output_path`.
///
/// Uses atomic write (temp file + rename) so a failed or cancelled run never
/// leaves a partial deck behind.
pub async fn convert_to_file(
    input: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionStats, Pdf2PptxError> {
    let output = convert_file(input, config).await?;
    write_atomic(output_path.as_ref(), &output.pptx).await?;
    Ok(output.stats)
}

/// Synchronous wrapper around [`convert_file`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    input: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2PptxError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Pdf2PptxError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert_file(input, config))
}

/// Read document metadata without rendering any page.
///
/// `pdfium_lib_path` names the pdfium library explicitly; `None` searches
/// the usual locations.
pub async fn inspect(
    bytes: Vec<u8>,
    password: Option<String>,
    pdfium_lib_path: Option<PathBuf>,
) -> Result<DocumentMetadata, Pdf2PptxError> {
    if let Some(ref path) = pdfium_lib_path {
        if !path.exists() {
            return Err(Pdf2PptxError::InvalidConfig(format!(
                "pdfium library not found at '{}'",
                path.display()
            )));
        }
    }
    tokio::task::spawn_blocking(move || {
        let loader = PdfiumLoader::bind(pdfium_lib_path.as_deref())?;
        inspect_with_loader(&loader, &bytes, password.as_deref())
    })
    .await
    .map_err(|e| Pdf2PptxError::Internal(format!("inspect task panicked: {e}")))?
}

/// [`inspect`] through an arbitrary loader, on the current thread.
pub fn inspect_with_loader(
    loader: &dyn DocumentLoader,
    bytes: &[u8],
    password: Option<&str>,
) -> Result<DocumentMetadata, Pdf2PptxError> {
    let document = loader.load(bytes, password)?;
    Ok(document.metadata())
}

/// Default output location: `source` with its extension replaced by `.pptx`.
pub fn output_path_for(source: impl AsRef<Path>) -> PathBuf {
    source.as_ref().with_extension("pptx")
}

// ── Internal helpers ─────────────────────────────────────────────────────

async fn read_input(path: &Path) -> Result<Vec<u8>, Pdf2PptxError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => {
            info!("Read {} bytes from {}", bytes.len(), path.display());
            Ok(bytes)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Pdf2PptxError::FileNotFound {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(Pdf2PptxError::InputReadFailed {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

async fn write_atomic(path: &Path, data: &[u8]) -> Result<(), Pdf2PptxError> {
    let write_err = |e| Pdf2PptxError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }

    let tmp_path = path.with_extension("pptx.tmp");
    tokio::fs::write(&tmp_path, data).await.map_err(write_err)?;
    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(write_err(e));
    }
    debug!("Wrote {} bytes to {}", data.len(), path.display());
    Ok(())
}
