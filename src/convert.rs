//! The conversion orchestrator: classification → extraction →
//! normalization → persistence, as one sequential unit of work.
//!
//! ## Failure policy
//!
//! Only storage faults abort: a failed blob write returns an error before
//! any record exists, and a failed record create surfaces as a hard
//! failure. Extraction and normalization never abort — they degrade to
//! empty text or the error-marker string and the record is persisted in
//! full either way. Callers therefore see either a complete record or an
//! explicit error, never a partially populated record.

use crate::backend::CompletionBackend;
use crate::config::ConversionConfig;
use crate::error::ConvertError;
use crate::format::DocumentFormat;
use crate::output::{ConversionRecord, Normalization, RecordDraft};
use crate::pipeline::ocr::OcrEngine;
use crate::pipeline::{extract, normalize};
use crate::store::{BlobStore, RecordStore};
use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// An uploaded document, borrowed from the caller for the duration of one
/// conversion. Not retained afterwards.
#[derive(Debug, Clone, Copy)]
pub struct UploadedDocument<'a> {
    /// Raw file bytes.
    pub bytes: &'a [u8],
    /// Declared media type (e.g. `application/pdf`).
    pub media_type: &'a str,
    /// Original file name as uploaded.
    pub file_name: &'a str,
}

/// The document-to-JSON conversion pipeline, wired to its collaborators.
///
/// Construction validates configuration and probes the OCR engine exactly
/// once; per-request calls never repeat that setup.
pub struct Converter {
    config: ConversionConfig,
    blobs: Arc<dyn BlobStore>,
    records: Arc<dyn RecordStore>,
    backend: Arc<dyn CompletionBackend>,
    ocr: OcrEngine,
}

impl Converter {
    /// Wire up a converter. Fails fast on configuration errors (e.g. a
    /// configured tessdata directory that does not exist).
    pub fn new(
        config: ConversionConfig,
        blobs: Arc<dyn BlobStore>,
        records: Arc<dyn RecordStore>,
        backend: Arc<dyn CompletionBackend>,
    ) -> Result<Self, ConvertError> {
        let ocr = OcrEngine::probe(&config)?;
        Ok(Self {
            config,
            blobs,
            records,
            backend,
            ocr,
        })
    }

    /// Convert one upload: persist the raw bytes, extract text, normalize
    /// it to JSON-shaped text, and store the resulting record.
    ///
    /// # Errors
    /// Only storage faults: blob write failure (before any record exists)
    /// or record-create failure. Extraction and normalization degrade
    /// instead of failing.
    pub async fn convert(
        &self,
        upload: UploadedDocument<'_>,
    ) -> Result<ConversionRecord, ConvertError> {
        info!(
            "Converting '{}' ({}, {} bytes)",
            upload.file_name,
            upload.media_type,
            upload.bytes.len()
        );

        // ── Step 1: Persist the raw bytes ────────────────────────────────
        let blob_name = unique_blob_name(upload.file_name);
        let stored_path = self.blobs.write(upload.bytes, &blob_name)?;

        // ── Step 2: Record metadata ──────────────────────────────────────
        let mut draft = RecordDraft {
            file_name: upload.file_name.to_string(),
            media_type: upload.media_type.to_string(),
            size_bytes: upload.bytes.len() as u64,
            stored_path: stored_path.clone(),
            created_at: Utc::now(),
            json_data: None,
        };

        // ── Step 3: Classify → extract → normalize ───────────────────────
        let format = DocumentFormat::classify(upload.media_type);
        let extraction = extract::extract(
            format,
            &stored_path,
            upload.media_type,
            &self.config,
            &self.ocr,
        )
        .await;
        let normalization =
            normalize::normalize(self.backend.as_ref(), &extraction.text, &self.config).await;

        // ── Step 4: Attach and persist ───────────────────────────────────
        draft.json_data = Some(normalization.json);
        let record = self.records.create(draft)?;

        info!(
            "Conversion complete: record {} [{}], {} extraction diagnostic(s)",
            record.id,
            format,
            extraction.diagnostics.len()
        );
        Ok(record)
    }

    /// Re-run only the normalization stage against a stored record's
    /// already-normalized text, overwriting the record's JSON field.
    ///
    /// Extraction is *not* re-run; the stored JSON text (empty when never
    /// populated) is fed back into the normalizer as input. This allows
    /// regenerating a structured response without re-uploading the file.
    pub async fn regenerate(&self, id: u64) -> Result<ConversionRecord, ConvertError> {
        let record = self
            .records
            .get(id)?
            .ok_or(ConvertError::RecordNotFound { id })?;

        let input = record.json_data.as_deref().unwrap_or("");
        let Normalization { json, .. } =
            normalize::normalize(self.backend.as_ref(), input, &self.config).await;

        self.records.set_json(id, &json)?;
        info!("Regenerated JSON for record {id}");

        Ok(ConversionRecord {
            json_data: Some(json),
            ..record
        })
    }

    /// Fetch one record by id.
    pub fn record(&self, id: u64) -> Result<Option<ConversionRecord>, ConvertError> {
        self.records.get(id)
    }

    /// All records, in creation order.
    pub fn list(&self) -> Result<Vec<ConversionRecord>, ConvertError> {
        self.records.list()
    }

    /// Read a stored blob back, e.g. for download endpoints.
    pub fn blob(&self, path: &Path) -> Result<Vec<u8>, ConvertError> {
        self.blobs.read(path)
    }
}

/// A fresh unique blob name that preserves the original extension (when
/// there is one) so extractors and external tools can recognise the type
/// from the stored path.
fn unique_blob_name(original_name: &str) -> String {
    let id = Uuid::new_v4();
    match Path::new(original_name).extension().and_then(|e| e.to_str()) {
        Some(ext) if !ext.is_empty() => format!("{id}.{ext}"),
        _ => id.to_string(),
    }
}
