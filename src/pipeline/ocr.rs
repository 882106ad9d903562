//! OCR engine: recognise text in an image file via the `tesseract`
//! executable.
//!
//! ## Why probe once?
//!
//! A missing tesseract install or language-data directory is a deployment
//! problem, not a per-request one. [`OcrEngine::probe`] checks both when
//! the converter is constructed: a configured-but-absent tessdata
//! directory fails startup outright, and a missing executable is logged
//! loudly once, after which every OCR stage degrades with an
//! [`StageError::OcrUnavailable`] diagnostic instead of re-spawning a
//! doomed process per request.

use crate::config::ConversionConfig;
use crate::error::{ConvertError, StageError};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, warn};

/// Shared, read-only OCR resource: the tesseract invocation parameters
/// plus the result of the one-time availability probe.
#[derive(Debug, Clone)]
pub struct OcrEngine {
    tessdata_dir: Option<PathBuf>,
    language: String,
    available: bool,
}

impl OcrEngine {
    /// Validate the OCR configuration and probe the executable once.
    ///
    /// # Errors
    /// [`ConvertError::TessdataNotFound`] when a tessdata directory is
    /// configured but does not exist. A missing executable is *not* fatal
    /// (uploads without images still convert fine); it is reported here
    /// once and every later OCR call degrades.
    pub fn probe(config: &ConversionConfig) -> Result<Self, ConvertError> {
        if let Some(ref dir) = config.tessdata_dir {
            if !dir.is_dir() {
                return Err(ConvertError::TessdataNotFound { path: dir.clone() });
            }
        }

        let available = Command::new("tesseract")
            .arg("--version")
            .output()
            .map(|out| out.status.success())
            .unwrap_or(false);

        if !available {
            warn!(
                "tesseract executable not found — OCR stages will degrade to empty text \
                 (install tesseract-ocr to enable image and scanned-PDF extraction)"
            );
        }

        Ok(Self {
            tessdata_dir: config.tessdata_dir.clone(),
            language: config.ocr_language.clone(),
            available,
        })
    }

    /// An engine that always degrades. Used when OCR is intentionally off.
    pub fn disabled() -> Self {
        Self {
            tessdata_dir: None,
            language: "eng".to_string(),
            available: false,
        }
    }

    /// Whether the startup probe found a usable executable.
    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Recognise text in one image file. Blocking; callers run this under
    /// `spawn_blocking`.
    pub fn recognize(&self, image_path: &Path) -> Result<String, StageError> {
        if !self.available {
            return Err(StageError::OcrUnavailable {
                detail: "tesseract executable not found at startup".into(),
            });
        }

        let mut cmd = Command::new("tesseract");
        cmd.arg(image_path).arg("stdout").arg("-l").arg(&self.language);
        if let Some(ref dir) = self.tessdata_dir {
            cmd.arg("--tessdata-dir").arg(dir);
        }

        let output = cmd.output().map_err(|e| StageError::OcrFailed {
            detail: format!("failed to run tesseract: {e}"),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(StageError::OcrFailed {
                detail: format!(
                    "tesseract exited with {}: {}",
                    output.status,
                    stderr.trim()
                ),
            });
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        debug!(
            "OCR on {}: {} chars recognised",
            image_path.display(),
            text.len()
        );
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_engine_degrades() {
        let engine = OcrEngine::disabled();
        assert!(!engine.is_available());
        let err = engine.recognize(Path::new("/tmp/whatever.png"));
        assert!(matches!(err, Err(StageError::OcrUnavailable { .. })));
    }

    #[test]
    fn missing_tessdata_dir_fails_probe() {
        let config = ConversionConfig::builder()
            .tessdata_dir("/nonexistent/tessdata-dir")
            .build()
            .unwrap();
        let err = OcrEngine::probe(&config);
        assert!(matches!(err, Err(ConvertError::TessdataNotFound { .. })));
    }

    #[test]
    fn probe_without_tessdata_dir_never_fails() {
        // Regardless of whether tesseract is installed, probing with no
        // tessdata directory configured must succeed; absence of the
        // executable only flips `available`.
        let config = ConversionConfig::default();
        let engine = OcrEngine::probe(&config).unwrap();
        let _ = engine.is_available();
    }
}
