//! Error types for the pdf2pptx library.
//!
//! A conversion has exactly one terminal outcome. Every failure, whether it
//! happens while decoding the document, rasterising page 17 or writing the
//! package, surfaces as a single [`Pdf2PptxError`]. There is no per-page
//! partial-success mode: one unreadable page aborts the whole deck.
//!
//! [`Pdf2PptxError::kind`] collapses the detailed variants into the small
//! [`ErrorKind`] taxonomy that callers branch on when choosing a user-facing
//! message.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdf2pptx library.
#[derive(Debug, Error)]
pub enum Pdf2PptxError {
    // ── Decode errors ─────────────────────────────────────────────────────
    /// Header/trailer/xref is corrupt, the version is unsupported or the
    /// stream is truncated.
    #[error("Document could not be decoded: {detail}")]
    CorruptDocument { detail: String },

    /// The document requires a password but none was provided.
    #[error("Document is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired,

    /// A password was provided but it is wrong.
    #[error("Wrong password for encrypted document")]
    WrongPassword,

    // ── Render errors ─────────────────────────────────────────────────────
    /// A page could not be rasterised or its pixels could not be encoded.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RenderFailed { page: usize, detail: String },

    // ── Deck builder protocol errors ──────────────────────────────────────
    /// Deck builder or pipeline used out of order.
    #[error("Invalid state: {0}")]
    State(String),

    /// The document had no pages, so there is nothing to finalize.
    #[error("Cannot finalize a deck with zero slides")]
    EmptyDeck,

    // ── Caller-initiated ──────────────────────────────────────────────────
    /// The caller abandoned the conversion between two page cycles.
    #[error("Conversion cancelled after {completed_pages} page(s)")]
    Cancelled { completed_pages: usize },

    // ── Environment errors ────────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
You can:\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium to use an existing copy.\n\
  • Pass --pdfium-lib /path/to/libpdfium on the command line.\n\
  • Place libpdfium next to the executable or in the working directory.\n"
    )]
    PdfiumBindingFailed(String),

    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Could not read the input file.
    #[error("Failed to read '{path}': {source}")]
    InputReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not create or write the output deck.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// The package writer failed, or a worker task panicked.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse failure classification delivered on the failure channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Unreadable or unsupported source document.
    Decode,
    /// A specific page failed to rasterise.
    Render,
    /// Protocol misuse: deck builder or pipeline called out of order.
    State,
    /// A zero-page document reached finalize.
    EmptyDeck,
    /// Caller-initiated abandonment.
    Cancelled,
    /// Missing library, unreadable input file, unwritable output, bad config.
    Environment,
    /// Anything else.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Decode => "DecodeError",
            ErrorKind::Render => "RenderError",
            ErrorKind::State => "StateError",
            ErrorKind::EmptyDeck => "EmptyDeckError",
            ErrorKind::Cancelled => "Cancelled",
            ErrorKind::Environment => "EnvironmentError",
            ErrorKind::Internal => "InternalError",
        };
        f.write_str(name)
    }
}

impl Pdf2PptxError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Pdf2PptxError::CorruptDocument { .. }
            | Pdf2PptxError::PasswordRequired
            | Pdf2PptxError::WrongPassword => ErrorKind::Decode,
            Pdf2PptxError::RenderFailed { .. } => ErrorKind::Render,
            Pdf2PptxError::State(_) => ErrorKind::State,
            Pdf2PptxError::EmptyDeck => ErrorKind::EmptyDeck,
            Pdf2PptxError::Cancelled { .. } => ErrorKind::Cancelled,
            Pdf2PptxError::PdfiumBindingFailed(_)
            | Pdf2PptxError::FileNotFound { .. }
            | Pdf2PptxError::InputReadFailed { .. }
            | Pdf2PptxError::OutputWriteFailed { .. }
            | Pdf2PptxError::InvalidConfig(_) => ErrorKind::Environment,
            Pdf2PptxError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn state(msg: impl Into<String>) -> Self {
        Pdf2PptxError::State(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_failed_display() {
        let e = Pdf2PptxError::RenderFailed {
            page: 3,
            detail: "out of memory".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("page 3"), "got: {msg}");
        assert!(msg.contains("out of memory"), "got: {msg}");
    }

    #[test]
    fn cancelled_display_counts_pages() {
        let e = Pdf2PptxError::Cancelled { completed_pages: 2 };
        assert!(e.to_string().contains("2 page"));
    }

    #[test]
    fn decode_variants_share_a_kind() {
        for e in [
            Pdf2PptxError::CorruptDocument {
                detail: "bad xref".into(),
            },
            Pdf2PptxError::PasswordRequired,
            Pdf2PptxError::WrongPassword,
        ] {
            assert_eq!(e.kind(), ErrorKind::Decode);
        }
    }

    #[test]
    fn kind_mapping() {
        assert_eq!(Pdf2PptxError::EmptyDeck.kind(), ErrorKind::EmptyDeck);
        assert_eq!(Pdf2PptxError::state("twice").kind(), ErrorKind::State);
        assert_eq!(
            Pdf2PptxError::PdfiumBindingFailed("nope".into()).kind(),
            ErrorKind::Environment
        );
        assert_eq!(
            Pdf2PptxError::Cancelled { completed_pages: 0 }.kind(),
            ErrorKind::Cancelled
        );
    }

    #[test]
    fn kind_display_uses_taxonomy_names() {
        assert_eq!(ErrorKind::Decode.to_string(), "DecodeError");
        assert_eq!(ErrorKind::EmptyDeck.to_string(), "EmptyDeckError");
    }
}
