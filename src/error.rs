//! Error types for the doc2json library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ConvertError`] — **Fatal**: the conversion cannot proceed at all
//!   (invalid configuration, blob write failed, record could not be
//!   persisted). Returned as `Err(ConvertError)` from the top-level
//!   [`crate::convert::Converter`] operations. When a fatal error occurs
//!   before the record is created, no partial record is ever persisted.
//!
//! * [`StageError`] — **Non-fatal**: one pipeline stage degraded (native
//!   PDF text unreadable, OCR engine missing, backend call failed) but the
//!   conversion still completes with an empty or error-marker value for
//!   that stage. Stored inside [`crate::output::Extraction`] and
//!   [`crate::output::Normalization`] so callers can tell "genuinely
//!   empty" apart from "failed and degraded".
//!
//! The separation lets callers decide their own tolerance: surface
//! diagnostics to users, log and continue, or ignore them entirely.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the doc2json library.
///
/// Stage-level degradations use [`StageError`] and are stored in the
/// pipeline outputs rather than propagated here.
#[derive(Debug, Error)]
pub enum ConvertError {
    // ── Configuration errors ──────────────────────────────────────────────
    /// Builder or startup validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configured tesseract language-data directory does not exist.
    #[error("Tesseract data directory not found: '{path}'\nSet ConversionConfig::tessdata_dir to an existing tessdata directory or leave it unset to use the system default.")]
    TessdataNotFound { path: PathBuf },

    // ── Storage errors ────────────────────────────────────────────────────
    /// The raw upload could not be written to the blob store.
    ///
    /// This aborts the whole conversion; no record is created.
    #[error("Failed to store uploaded file as '{name}': {detail}")]
    BlobWriteFailed { name: String, detail: String },

    /// A stored blob could not be read back.
    #[error("Failed to read stored file '{path}': {detail}")]
    BlobReadFailed { path: PathBuf, detail: String },

    /// The record store rejected a create, read, or update.
    #[error("Record store operation failed: {0}")]
    RecordStoreFailed(String),

    /// No record exists with the given identifier.
    #[error("No conversion record with id {id}")]
    RecordNotFound { id: u64 },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error (e.g. a blocking task panicked).
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal, per-stage degradation.
///
/// The pipeline substitutes an empty string (extraction) or the literal
/// error-marker text (normalization) and continues; the record is still
/// persisted in full. Serializable so HTTP layers can expose diagnostics.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum StageError {
    /// The native PDF text layer could not be read.
    #[error("Native PDF text extraction failed: {detail}")]
    PdfTextFailed { detail: String },

    /// The OCR engine ran but produced an error.
    #[error("OCR failed: {detail}")]
    OcrFailed { detail: String },

    /// The OCR engine was not found at startup; OCR stages are skipped.
    #[error("OCR engine unavailable: {detail}")]
    OcrUnavailable { detail: String },

    /// The DOCX document could not be opened or parsed.
    #[error("DOCX text extraction failed: {detail}")]
    DocxFailed { detail: String },

    /// The declared media type matched no known format; extraction was
    /// skipped and the pipeline continued with empty text.
    #[error("Unsupported media type '{media_type}'")]
    UnsupportedMediaType { media_type: String },

    /// The text-generation backend call failed; the normalized output is
    /// the literal error-marker string.
    #[error("Completion backend failed: {detail}")]
    BackendFailed { detail: String },
}
