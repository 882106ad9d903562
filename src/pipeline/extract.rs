//! Extraction dispatch: route a classified upload to its extractor.
//!
//! The classifier's [`DocumentFormat`] is matched exhaustively here — the
//! single place where format determines behaviour. Unsupported formats
//! short-circuit to an empty result without touching the stored file, but
//! do so *observably*: a diagnostic is recorded and a warning logged
//! rather than silently producing empty text.

use crate::config::ConversionConfig;
use crate::error::StageError;
use crate::format::DocumentFormat;
use crate::output::Extraction;
use crate::pipeline::ocr::OcrEngine;
use crate::pipeline::{docx, image, pdf};
use std::path::Path;
use tracing::{info, warn};

/// Run the extraction strategy for `format` against the stored file.
///
/// Always returns an [`Extraction`] with trimmed text (empty-string
/// floor); stage failures land in `diagnostics` instead of aborting.
pub async fn extract(
    format: DocumentFormat,
    stored_path: &Path,
    media_type: &str,
    config: &ConversionConfig,
    ocr: &OcrEngine,
) -> Extraction {
    let (text, diagnostics) = match format {
        DocumentFormat::Pdf => pdf::extract(stored_path, config, ocr).await,
        DocumentFormat::Docx => docx::extract(stored_path).await,
        DocumentFormat::Image => image::extract(stored_path, ocr).await,
        DocumentFormat::Unsupported => {
            warn!(
                "Unsupported media type '{}' — extraction skipped, continuing with empty text",
                media_type
            );
            (
                String::new(),
                vec![StageError::UnsupportedMediaType {
                    media_type: media_type.to_string(),
                }],
            )
        }
    };

    let extraction = Extraction::new(text, format, diagnostics);
    info!(
        "Extraction [{}]: {} chars, {} diagnostic(s)",
        format,
        extraction.text.len(),
        extraction.diagnostics.len()
    );
    extraction
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unsupported_short_circuits_without_touching_the_file() {
        let config = ConversionConfig::default();
        let extraction = extract(
            DocumentFormat::Unsupported,
            Path::new("/nonexistent/blob"),
            "text/csv",
            &config,
            &OcrEngine::disabled(),
        )
        .await;

        assert_eq!(extraction.text, "");
        assert_eq!(extraction.format, DocumentFormat::Unsupported);
        assert!(matches!(
            extraction.diagnostics.as_slice(),
            [StageError::UnsupportedMediaType { .. }]
        ));
    }

    #[tokio::test]
    async fn extraction_text_is_trimmed() {
        // The DOCX extractor appends a trailing newline per paragraph;
        // the dispatcher's Extraction enforces the trim invariant.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("one.docx");
        {
            use docx_rs::{Docx, Paragraph, Run};
            let file = std::fs::File::create(&path).unwrap();
            Docx::new()
                .add_paragraph(Paragraph::new().add_run(Run::new().add_text("only")))
                .build()
                .pack(file)
                .unwrap();
        }

        let config = ConversionConfig::default();
        let extraction = extract(
            DocumentFormat::Docx,
            &path,
            crate::format::MEDIA_TYPE_DOCX,
            &config,
            &OcrEngine::disabled(),
        )
        .await;

        assert_eq!(extraction.text, "only");
        assert!(!extraction.degraded());
    }
}
