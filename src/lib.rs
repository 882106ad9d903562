//! # doc2json
//!
//! Convert uploaded documents (PDF, DOCX, PNG, JPEG) to structured JSON
//! text using format-appropriate extraction and a text-generation backend.
//!
//! ## Pipeline Overview
//!
//! ```text
//! upload
//!  │
//!  ├─ 1. Store     raw bytes to the blob store under a unique name
//!  ├─ 2. Classify  declared media type → {pdf, docx, image, unsupported}
//!  ├─ 3. Extract   native PDF text + OCR / DOCX paragraphs / image OCR
//!  ├─ 4. Normalize backend completion with a fixed instruction prompt
//!  ├─ 5. Sanitize  strip ```json fences, trim
//!  └─ 6. Persist   ConversionRecord (metadata + JSON text), id assigned
//! ```
//!
//! Extraction and normalization are best-effort: a failing stage degrades
//! to empty text or an error marker and the record is still persisted.
//! Only storage faults abort a conversion.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use doc2json::{
//!     ConversionConfig, Converter, FsBlobStore, MemoryRecordStore, OllamaBackend,
//!     UploadedDocument,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::default();
//!     let backend = Arc::new(OllamaBackend::from_config(&config)?);
//!     let converter = Converter::new(
//!         config.clone(),
//!         Arc::new(FsBlobStore::new(&config.upload_dir)),
//!         Arc::new(MemoryRecordStore::new()),
//!         backend,
//!     )?;
//!
//!     let bytes = std::fs::read("invoice.pdf")?;
//!     let record = converter
//!         .convert(UploadedDocument {
//!             bytes: &bytes,
//!             media_type: "application/pdf",
//!             file_name: "invoice.pdf",
//!         })
//!         .await?;
//!     println!("{}", record.json_data.unwrap_or_default());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `doc2json` binary (clap + anyhow + tracing-subscriber + mime_guess) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! doc2json = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod backend;
pub mod config;
pub mod convert;
pub mod error;
pub mod format;
pub mod output;
pub mod pipeline;
pub mod prompts;
pub mod store;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use backend::{BackendError, CompletionBackend, OllamaBackend};
pub use config::{ConversionConfig, ConversionConfigBuilder};
pub use convert::{Converter, UploadedDocument};
pub use error::{ConvertError, StageError};
pub use format::DocumentFormat;
pub use output::{ConversionRecord, Extraction, Normalization, RecordDraft};
pub use pipeline::normalize::ERROR_MARKER;
pub use store::{BlobStore, FsBlobStore, MemoryRecordStore, RecordStore};
