//! Configuration for document-to-JSON conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`],
//! built via its [`ConversionConfigBuilder`]. Keeping every knob in one
//! struct makes it trivial to share configs across requests, serialise
//! them for logging, and diff two runs to understand why their outputs
//! differ.
//!
//! # Design choice: validate at build time
//! The OCR data path and upload directory used to be implicit process
//! state looked up on every extraction. Here they are explicit values
//! validated once when the [`crate::convert::Converter`] is constructed,
//! so a misconfigured deployment fails fast instead of silently producing
//! empty text on every request.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for a document-to-JSON conversion pipeline.
///
/// Built via [`ConversionConfig::builder()`] or
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use doc2json::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .upload_dir("/var/lib/doc2json/uploads")
///     .ocr_language("eng")
///     .model("llama3.1")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// Directory where uploaded blobs are stored. Default: `doc2json-uploads`
    /// under the system temp directory. Created on first use.
    pub upload_dir: PathBuf,

    /// Tesseract language-data directory (`--tessdata-dir`). Default: `None`,
    /// which lets the tesseract executable use its compiled-in default or
    /// the `TESSDATA_PREFIX` environment variable.
    ///
    /// When set, the directory must exist — checked once at startup rather
    /// than failing silently on every OCR call.
    pub tessdata_dir: Option<PathBuf>,

    /// Tesseract language code passed as `-l`. Default: `"eng"`.
    pub ocr_language: String,

    /// Maximum rendered page dimension in pixels when rasterising PDF pages
    /// for the OCR pass. Default: 2000.
    ///
    /// A safety cap independent of page size: an A0 poster rendered at full
    /// resolution could exhaust memory. Either dimension is capped, the
    /// other scales proportionally.
    pub max_rendered_pixels: u32,

    /// Base URL of the text-generation backend (Ollama-compatible).
    /// Default: `http://localhost:11434`.
    pub backend_base_url: String,

    /// Model identifier sent to the backend. Default: `"llama3.1"`.
    pub model: String,

    /// Sampling temperature for the completion. Default: 0.1.
    ///
    /// Low temperature keeps the model faithful to the extracted text,
    /// which is what structured re-formatting wants.
    pub temperature: f32,

    /// Maximum tokens the backend may generate per request. Default: 4096.
    pub max_tokens: usize,

    /// Per-backend-call timeout in seconds, enforced by the HTTP client at
    /// the collaborator boundary. Default: 120.
    ///
    /// The pipeline itself imposes no deadline; a hung backend surfaces as
    /// a timeout error from the client, which then degrades to the
    /// error-marker output.
    pub api_timeout_secs: u64,

    /// Custom normalization instruction prompt. If `None`, uses
    /// [`crate::prompts::NORMALIZE_PROMPT`].
    pub prompt: Option<String>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            upload_dir: std::env::temp_dir().join("doc2json-uploads"),
            tessdata_dir: None,
            ocr_language: "eng".to_string(),
            max_rendered_pixels: 2000,
            backend_base_url: "http://localhost:11434".to_string(),
            model: "llama3.1".to_string(),
            temperature: 0.1,
            max_tokens: 4096,
            api_timeout_secs: 120,
            prompt: None,
        }
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn upload_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.upload_dir = dir.into();
        self
    }

    pub fn tessdata_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.tessdata_dir = Some(dir.into());
        self
    }

    pub fn ocr_language(mut self, lang: impl Into<String>) -> Self {
        self.config.ocr_language = lang.into();
        self
    }

    pub fn max_rendered_pixels(mut self, px: u32) -> Self {
        self.config.max_rendered_pixels = px.max(100);
        self
    }

    pub fn backend_base_url(mut self, url: impl Into<String>) -> Self {
        let url: String = url.into();
        self.config.backend_base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.prompt = Some(prompt.into());
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, crate::error::ConvertError> {
        let c = &self.config;
        if c.ocr_language.is_empty() {
            return Err(crate::error::ConvertError::InvalidConfig(
                "OCR language must not be empty".into(),
            ));
        }
        if c.backend_base_url.is_empty() {
            return Err(crate::error::ConvertError::InvalidConfig(
                "Backend base URL must not be empty".into(),
            ));
        }
        if c.max_tokens == 0 {
            return Err(crate::error::ConvertError::InvalidConfig(
                "max_tokens must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let config = ConversionConfig::builder().build().unwrap();
        assert_eq!(config.ocr_language, "eng");
        assert_eq!(config.max_rendered_pixels, 2000);
        assert_eq!(config.api_timeout_secs, 120);
        assert!(config.tessdata_dir.is_none());
    }

    #[test]
    fn builder_rejects_empty_language() {
        let err = ConversionConfig::builder().ocr_language("").build();
        assert!(err.is_err());
    }

    #[test]
    fn builder_rejects_zero_max_tokens() {
        let err = ConversionConfig::builder().max_tokens(0).build();
        assert!(err.is_err());
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let config = ConversionConfig::builder()
            .backend_base_url("http://localhost:11434/")
            .build()
            .unwrap();
        assert_eq!(config.backend_base_url, "http://localhost:11434");
    }

    #[test]
    fn temperature_is_clamped() {
        let config = ConversionConfig::builder().temperature(9.0).build().unwrap();
        assert!(config.temperature <= 2.0);
    }
}
