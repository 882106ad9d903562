//! PDF text extraction: native text layer plus an OCR pass over the
//! rendered pages.
//!
//! ## Why both passes?
//!
//! A born-digital PDF carries its text in the page content streams and the
//! native pass captures it faithfully. A scanned PDF has no text layer at
//! all — only page images — so the same document is also rasterised and
//! run through the OCR engine, and the OCR output is appended after the
//! native text. Each pass degrades independently: a PDF with native text
//! but a failing OCR engine still yields its native text, and vice versa.
//!
//! ## Why spawn_blocking?
//!
//! pdfium wraps a C++ library with thread-local state that must not run on
//! async worker threads, and tesseract is an external process. Both passes
//! run on the blocking pool.

use crate::config::ConversionConfig;
use crate::error::StageError;
use crate::pipeline::ocr::OcrEngine;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::{debug, warn};

/// Extract text from a stored PDF: native text layer first, OCR output
/// appended. Returns the combined (untrimmed) text and any per-pass
/// diagnostics; never fails.
pub async fn extract(
    path: &Path,
    config: &ConversionConfig,
    ocr: &OcrEngine,
) -> (String, Vec<StageError>) {
    let path = path.to_path_buf();
    let max_pixels = config.max_rendered_pixels;
    let ocr = ocr.clone();

    match tokio::task::spawn_blocking(move || extract_blocking(&path, max_pixels, &ocr)).await {
        Ok(result) => result,
        Err(e) => (
            String::new(),
            vec![StageError::PdfTextFailed {
                detail: format!("extraction task panicked: {e}"),
            }],
        ),
    }
}

/// Blocking implementation of both passes.
fn extract_blocking(path: &Path, max_pixels: u32, ocr: &OcrEngine) -> (String, Vec<StageError>) {
    let mut diagnostics = Vec::new();

    let pdfium = Pdfium::default();
    let document = match pdfium.load_pdf_from_file(path, None) {
        Ok(doc) => doc,
        Err(e) => {
            // Neither pass can run without a loadable document.
            let detail = format!("{e:?}");
            warn!("PDF {} could not be loaded: {}", path.display(), detail);
            diagnostics.push(StageError::PdfTextFailed {
                detail: detail.clone(),
            });
            diagnostics.push(StageError::OcrFailed {
                detail: format!("document could not be loaded: {detail}"),
            });
            return (String::new(), diagnostics);
        }
    };

    let native = native_text(&document, &mut diagnostics);

    let ocr_text = if ocr.is_available() {
        ocr_pass(&document, max_pixels, ocr, &mut diagnostics)
    } else {
        diagnostics.push(StageError::OcrUnavailable {
            detail: "tesseract executable not found at startup".into(),
        });
        String::new()
    };

    (format!("{native}\n{ocr_text}"), diagnostics)
}

/// Concatenate every page's native text layer, in page order, separated by
/// newlines.
fn native_text(document: &PdfDocument<'_>, diagnostics: &mut Vec<StageError>) -> String {
    let pages = document.pages();
    let mut pages_text: Vec<String> = Vec::new();

    for (idx, page) in pages.iter().enumerate() {
        match page.text() {
            Ok(text) => pages_text.push(text.all()),
            Err(e) => {
                diagnostics.push(StageError::PdfTextFailed {
                    detail: format!("page {}: {e:?}", idx + 1),
                });
            }
        }
    }

    let text = pages_text.join("\n");
    debug!("Native PDF text: {} chars", text.len());
    text
}

/// Rasterise each page, recognise it with the OCR engine, and concatenate
/// the recognised text in page order.
fn ocr_pass(
    document: &PdfDocument<'_>,
    max_pixels: u32,
    ocr: &OcrEngine,
    diagnostics: &mut Vec<StageError>,
) -> String {
    let scratch = match tempfile::tempdir() {
        Ok(dir) => dir,
        Err(e) => {
            diagnostics.push(StageError::OcrFailed {
                detail: format!("could not create scratch directory: {e}"),
            });
            return String::new();
        }
    };

    let render_config = PdfRenderConfig::new()
        .set_target_width(max_pixels as i32)
        .set_maximum_height(max_pixels as i32);

    let pages = document.pages();
    let mut pages_text: Vec<String> = Vec::new();

    for (idx, page) in pages.iter().enumerate() {
        let page_num = idx + 1;

        let bitmap = match page.render_with_config(&render_config) {
            Ok(b) => b,
            Err(e) => {
                diagnostics.push(StageError::OcrFailed {
                    detail: format!("page {page_num}: rasterisation failed: {e:?}"),
                });
                continue;
            }
        };

        let png_path = scratch.path().join(format!("page-{page_num}.png"));
        if let Err(e) = bitmap.as_image().save(&png_path) {
            diagnostics.push(StageError::OcrFailed {
                detail: format!("page {page_num}: could not write scratch PNG: {e}"),
            });
            continue;
        }

        match ocr.recognize(&png_path) {
            Ok(text) => pages_text.push(text),
            Err(e) => diagnostics.push(e),
        }
    }

    let text = pages_text.join("\n");
    debug!("OCR pass: {} chars recognised", text.len());
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal one-page PDF carrying `text` in a real text layer, with a
    /// correct xref table so loaders need not reconstruct it.
    fn text_layer_pdf(text: &str) -> Vec<u8> {
        let content = format!("BT /F1 24 Tf 72 720 Td ({text}) Tj ET");
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 5 0 R >> >> /Contents 4 0 R >>"
                .to_string(),
            format!(
                "<< /Length {} >>\nstream\n{content}\nendstream",
                content.len()
            ),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        ];

        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::new();
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
        }
        let startxref = pdf.len();
        let mut tail = String::from("xref\n0 6\n0000000000 65535 f \n");
        for offset in offsets {
            tail.push_str(&format!("{offset:010} 00000 n \n"));
        }
        tail.push_str(&format!(
            "trailer\n<< /Size 6 /Root 1 0 R >>\nstartxref\n{startxref}\n%%EOF\n"
        ));
        pdf.extend_from_slice(tail.as_bytes());
        pdf
    }

    // Needs a pdfium shared library on the machine; Pdfium::default()
    // panics without one.
    #[tokio::test]
    async fn native_text_survives_an_unavailable_ocr_engine() {
        if std::env::var("DOC2JSON_PDF_TESTS").is_err() {
            println!("SKIP — set DOC2JSON_PDF_TESTS=1 to run pdfium-backed tests");
            return;
        }

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("native.pdf");
        std::fs::write(&path, text_layer_pdf("Native layer text")).unwrap();

        let config = ConversionConfig::default();
        let (text, diagnostics) = extract(&path, &config, &OcrEngine::disabled()).await;

        assert!(
            text.contains("Native layer text"),
            "native text layer lost: {text:?}"
        );
        assert!(
            diagnostics
                .iter()
                .any(|d| matches!(d, StageError::OcrUnavailable { .. })),
            "expected an OCR-unavailable diagnostic, got {diagnostics:?}"
        );
        assert!(
            !diagnostics
                .iter()
                .any(|d| matches!(d, StageError::PdfTextFailed { .. })),
            "native pass should not degrade: {diagnostics:?}"
        );
    }

    #[tokio::test]
    async fn unreadable_pdf_degrades_to_empty_with_diagnostics() {
        if std::env::var("DOC2JSON_PDF_TESTS").is_err() {
            println!("SKIP — set DOC2JSON_PDF_TESTS=1 to run pdfium-backed tests");
            return;
        }

        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("not-a.pdf");
        std::fs::write(&bogus, b"this is not a pdf").unwrap();

        let config = ConversionConfig::default();
        let (text, diagnostics) = extract(&bogus, &config, &OcrEngine::disabled()).await;

        assert_eq!(text, "");
        assert!(
            diagnostics
                .iter()
                .any(|d| matches!(d, StageError::PdfTextFailed { .. })),
            "expected a native-text diagnostic, got {diagnostics:?}"
        );
    }
}
