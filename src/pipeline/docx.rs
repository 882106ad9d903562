//! DOCX text extraction: walk the document's paragraphs in order.
//!
//! Only paragraph text is extracted — tables, headers, footers, and
//! embedded objects are out of scope for the conversion pipeline. Each
//! paragraph contributes its run text followed by a newline, so paragraph
//! boundaries survive into the extracted text.

use crate::error::StageError;
use docx_rs::{read_docx, DocumentChild, ParagraphChild, RunChild};
use std::path::Path;
use tracing::debug;

/// Extract paragraph text from a stored DOCX file. Returns the (untrimmed)
/// text and a diagnostic when the document could not be read; never fails.
pub async fn extract(path: &Path) -> (String, Vec<StageError>) {
    let path = path.to_path_buf();
    match tokio::task::spawn_blocking(move || extract_blocking(&path)).await {
        Ok(Ok(text)) => (text, Vec::new()),
        Ok(Err(diag)) => (String::new(), vec![diag]),
        Err(e) => (
            String::new(),
            vec![StageError::DocxFailed {
                detail: format!("extraction task panicked: {e}"),
            }],
        ),
    }
}

/// Blocking implementation: parse the document and concatenate paragraphs.
fn extract_blocking(path: &Path) -> Result<String, StageError> {
    let bytes = std::fs::read(path).map_err(|e| StageError::DocxFailed {
        detail: format!("reading '{}': {e}", path.display()),
    })?;

    let document = read_docx(&bytes).map_err(|e| StageError::DocxFailed {
        detail: format!("{e:?}"),
    })?;

    let mut text = String::new();
    for child in &document.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            for para_child in &paragraph.children {
                if let ParagraphChild::Run(run) = para_child {
                    for run_child in &run.children {
                        if let RunChild::Text(t) = run_child {
                            text.push_str(&t.text);
                        }
                    }
                }
            }
            text.push('\n');
        }
    }

    debug!("DOCX text: {} chars from {}", text.len(), path.display());
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{Docx, Paragraph, Run};

    fn write_docx(path: &Path, paragraphs: &[&str]) {
        let mut docx = Docx::new();
        for p in paragraphs {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*p)));
        }
        let file = std::fs::File::create(path).unwrap();
        docx.build().pack(file).unwrap();
    }

    #[tokio::test]
    async fn preserves_paragraph_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("two-paragraphs.docx");
        write_docx(&path, &["A", "B"]);

        let (text, diagnostics) = extract(&path).await;
        assert!(diagnostics.is_empty(), "got {diagnostics:?}");
        assert!(
            text.starts_with("A\nB"),
            "paragraphs out of order: {text:?}"
        );
    }

    #[tokio::test]
    async fn missing_file_degrades_with_diagnostic() {
        let (text, diagnostics) = extract(Path::new("/nonexistent/file.docx")).await;
        assert_eq!(text, "");
        assert!(matches!(
            diagnostics.as_slice(),
            [StageError::DocxFailed { .. }]
        ));
    }

    #[tokio::test]
    async fn garbage_bytes_degrade_with_diagnostic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.docx");
        std::fs::write(&path, b"not a zip archive").unwrap();

        let (text, diagnostics) = extract(&path).await;
        assert_eq!(text, "");
        assert_eq!(diagnostics.len(), 1);
    }
}
