//! Image text extraction: run the OCR engine directly on the stored file.

use crate::error::StageError;
use crate::pipeline::ocr::OcrEngine;
use std::path::Path;

/// Recognise text in a stored PNG or JPEG. Returns the recognised text and
/// a diagnostic when the engine failed or is unavailable; never fails.
pub async fn extract(path: &Path, ocr: &OcrEngine) -> (String, Vec<StageError>) {
    let path = path.to_path_buf();
    let ocr = ocr.clone();

    match tokio::task::spawn_blocking(move || ocr.recognize(&path)).await {
        Ok(Ok(text)) => (text, Vec::new()),
        Ok(Err(diag)) => (String::new(), vec![diag]),
        Err(e) => (
            String::new(),
            vec![StageError::OcrFailed {
                detail: format!("OCR task panicked: {e}"),
            }],
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unavailable_engine_degrades() {
        let (text, diagnostics) =
            extract(Path::new("/tmp/scan.png"), &OcrEngine::disabled()).await;
        assert_eq!(text, "");
        assert!(matches!(
            diagnostics.as_slice(),
            [StageError::OcrUnavailable { .. }]
        ));
    }
}
