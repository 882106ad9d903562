//! Pipeline output types: extraction results, normalization results, and
//! the persisted conversion record.
//!
//! ## Why diagnostics instead of `Result`?
//!
//! Extraction and normalization are best-effort: a failing stage degrades
//! to an empty string or an error marker and the conversion continues.
//! Returning `Result` from those stages would force callers to choose
//! between aborting and discarding the failure. Instead each output carries
//! the text it produced *and* the diagnostics describing what degraded, so
//! "no failure, genuinely empty" and "failure, degraded" stay
//! distinguishable in logs, tests, and API responses.

use crate::error::StageError;
use crate::format::DocumentFormat;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Plain text extracted from one uploaded document.
///
/// Invariant: `text` is always trimmed of leading/trailing whitespace and
/// never absent — an empty string is the floor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Extraction {
    /// The extracted text, trimmed. Empty when nothing was extracted.
    pub text: String,
    /// Which extraction strategy ran.
    pub format: DocumentFormat,
    /// Degradations encountered along the way. Empty means every stage
    /// that ran succeeded (the text may still legitimately be empty).
    pub diagnostics: Vec<StageError>,
}

impl Extraction {
    /// Build an extraction result, enforcing the trim invariant.
    pub fn new(text: impl AsRef<str>, format: DocumentFormat, diagnostics: Vec<StageError>) -> Self {
        Self {
            text: text.as_ref().trim().to_string(),
            format,
            diagnostics,
        }
    }

    /// True when at least one stage degraded.
    pub fn degraded(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// The outcome of normalizing extracted text into JSON-shaped text.
///
/// Never represents a hard failure: when the backend call fails, `json`
/// holds the literal error-marker string and `diagnostic` says why.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Normalization {
    /// Sanitized backend output. Not validated as JSON — malformed output
    /// passes through unchanged.
    pub json: String,
    /// Present when the backend call failed and `json` is the error marker.
    pub diagnostic: Option<StageError>,
}

/// Metadata for a conversion before the record store has assigned an id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordDraft {
    /// Original file name as uploaded.
    pub file_name: String,
    /// Declared media type of the upload.
    pub media_type: String,
    /// Upload size in bytes.
    pub size_bytes: u64,
    /// Where the blob store placed the raw file.
    pub stored_path: PathBuf,
    /// When the conversion started.
    pub created_at: DateTime<Utc>,
    /// Normalized JSON text; `None` until normalization has run.
    pub json_data: Option<String>,
}

/// The persisted artifact of one conversion: upload metadata plus the
/// normalized JSON text. Created exactly once per upload; immutable
/// afterwards except for `json_data`, which re-generation overwrites.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionRecord {
    /// Identifier assigned by the record store on creation.
    pub id: u64,
    pub file_name: String,
    pub media_type: String,
    pub size_bytes: u64,
    pub stored_path: PathBuf,
    pub created_at: DateTime<Utc>,
    pub json_data: Option<String>,
}

impl ConversionRecord {
    /// Assemble a record from a draft and a store-assigned id.
    pub fn from_draft(id: u64, draft: RecordDraft) -> Self {
        Self {
            id,
            file_name: draft.file_name,
            media_type: draft.media_type,
            size_bytes: draft.size_bytes,
            stored_path: draft.stored_path,
            created_at: draft.created_at,
            json_data: draft.json_data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraction_trims_text() {
        let e = Extraction::new("  hello\nworld \n", DocumentFormat::Pdf, vec![]);
        assert_eq!(e.text, "hello\nworld");
        assert!(!e.degraded());
    }

    #[test]
    fn empty_extraction_with_diagnostic_is_degraded() {
        let e = Extraction::new(
            "",
            DocumentFormat::Image,
            vec![StageError::OcrFailed {
                detail: "boom".into(),
            }],
        );
        assert_eq!(e.text, "");
        assert!(e.degraded());
    }

    #[test]
    fn record_from_draft_copies_all_fields() {
        let draft = RecordDraft {
            file_name: "report.pdf".into(),
            media_type: "application/pdf".into(),
            size_bytes: 123,
            stored_path: PathBuf::from("/tmp/x.pdf"),
            created_at: Utc::now(),
            json_data: Some("{}".into()),
        };
        let record = ConversionRecord::from_draft(7, draft.clone());
        assert_eq!(record.id, 7);
        assert_eq!(record.file_name, draft.file_name);
        assert_eq!(record.size_bytes, 123);
        assert_eq!(record.json_data.as_deref(), Some("{}"));
    }
}
