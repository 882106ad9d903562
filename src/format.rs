//! Media-type classification: pick an extraction strategy for an upload.
//!
//! The declared media type is inspected exactly once, up front, and turned
//! into a closed [`DocumentFormat`] variant that the extractor matches
//! exhaustively. Adding a format is a single enumeration change here rather
//! than string comparisons scattered through the pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Media type for PDF documents.
pub const MEDIA_TYPE_PDF: &str = "application/pdf";
/// Media type for OOXML word-processing documents (.docx).
pub const MEDIA_TYPE_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
/// Media type for PNG images.
pub const MEDIA_TYPE_PNG: &str = "image/png";
/// Media type for JPEG images.
pub const MEDIA_TYPE_JPEG: &str = "image/jpeg";

/// The extraction strategy selected for an uploaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    /// Native PDF text layer plus an OCR pass over the rendered pages.
    Pdf,
    /// DOCX paragraph text, in document order.
    Docx,
    /// Direct OCR on the image file (PNG or JPEG).
    Image,
    /// No extractor applies; extraction yields empty text.
    #[serde(rename = "unknown")]
    Unsupported,
}

impl DocumentFormat {
    /// Classify a declared media type. Pure and total: every input maps to
    /// exactly one variant and unknown types fall through to
    /// [`DocumentFormat::Unsupported`].
    pub fn classify(media_type: &str) -> Self {
        match media_type {
            MEDIA_TYPE_PDF => DocumentFormat::Pdf,
            MEDIA_TYPE_DOCX => DocumentFormat::Docx,
            MEDIA_TYPE_PNG | MEDIA_TYPE_JPEG => DocumentFormat::Image,
            _ => DocumentFormat::Unsupported,
        }
    }

    /// Short source-format tag used in records and logs.
    pub fn tag(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
            DocumentFormat::Image => "image",
            DocumentFormat::Unsupported => "unknown",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_pdf() {
        assert_eq!(
            DocumentFormat::classify("application/pdf"),
            DocumentFormat::Pdf
        );
    }

    #[test]
    fn classifies_docx() {
        assert_eq!(
            DocumentFormat::classify(
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            ),
            DocumentFormat::Docx
        );
    }

    #[test]
    fn classifies_images() {
        assert_eq!(
            DocumentFormat::classify("image/png"),
            DocumentFormat::Image
        );
        assert_eq!(
            DocumentFormat::classify("image/jpeg"),
            DocumentFormat::Image
        );
    }

    #[test]
    fn everything_else_is_unsupported() {
        for mt in [
            "",
            "text/plain",
            "text/csv",
            "application/json",
            "image/gif",
            "image/jpg",
            "application/PDF",
            "application/msword",
        ] {
            assert_eq!(
                DocumentFormat::classify(mt),
                DocumentFormat::Unsupported,
                "media type {mt:?} should be unsupported"
            );
        }
    }

    #[test]
    fn tags_match_record_vocabulary() {
        assert_eq!(DocumentFormat::Pdf.tag(), "pdf");
        assert_eq!(DocumentFormat::Docx.tag(), "docx");
        assert_eq!(DocumentFormat::Image.tag(), "image");
        assert_eq!(DocumentFormat::Unsupported.tag(), "unknown");
    }

    #[test]
    fn serde_uses_the_tag_vocabulary() {
        assert_eq!(
            serde_json::to_string(&DocumentFormat::Pdf).unwrap(),
            "\"pdf\""
        );
        // The serialized form matches tag(), including the unsupported case.
        assert_eq!(
            serde_json::to_string(&DocumentFormat::Unsupported).unwrap(),
            "\"unknown\""
        );
        assert_eq!(
            serde_json::from_str::<DocumentFormat>("\"unknown\"").unwrap(),
            DocumentFormat::Unsupported
        );
    }
}
