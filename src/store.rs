//! Storage collaborators: the blob store for raw uploads and the record
//! store for conversion records.
//!
//! Both are trait seams. The pipeline only needs the narrow contracts
//! below; production deployments plug in whatever durable storage they
//! have, while the shipped [`FsBlobStore`] and [`MemoryRecordStore`] cover
//! the CLI and tests. Each implementation is responsible for its own
//! concurrency safety — the record store must provide atomic per-record
//! create/read.

use crate::error::ConvertError;
use crate::output::{ConversionRecord, RecordDraft};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// Durable storage for raw uploaded bytes.
pub trait BlobStore: Send + Sync {
    /// Write `bytes` under `suggested_name` and return the stored path.
    /// Must not silently truncate; a failed write returns an error and
    /// leaves no usable blob behind.
    fn write(&self, bytes: &[u8], suggested_name: &str) -> Result<PathBuf, ConvertError>;

    /// Read a previously stored blob back.
    fn read(&self, path: &Path) -> Result<Vec<u8>, ConvertError>;
}

/// Durable storage for [`ConversionRecord`]s, keyed by a store-assigned id.
pub trait RecordStore: Send + Sync {
    /// Persist a new record and return it with its assigned identifier.
    fn create(&self, draft: RecordDraft) -> Result<ConversionRecord, ConvertError>;

    /// Fetch a record by id. `Ok(None)` when absent.
    fn get(&self, id: u64) -> Result<Option<ConversionRecord>, ConvertError>;

    /// All records, in creation order.
    fn list(&self) -> Result<Vec<ConversionRecord>, ConvertError>;

    /// Overwrite only the normalized-JSON field of an existing record.
    fn set_json(&self, id: u64, json: &str) -> Result<(), ConvertError>;
}

// ── Filesystem blob store ────────────────────────────────────────────────

/// Blob store backed by a directory on the local filesystem.
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Create a store rooted at `root`. The directory is created lazily on
    /// the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl BlobStore for FsBlobStore {
    fn write(&self, bytes: &[u8], suggested_name: &str) -> Result<PathBuf, ConvertError> {
        std::fs::create_dir_all(&self.root).map_err(|e| ConvertError::BlobWriteFailed {
            name: suggested_name.to_string(),
            detail: format!("creating '{}': {e}", self.root.display()),
        })?;
        let path = self.root.join(suggested_name);
        std::fs::write(&path, bytes).map_err(|e| ConvertError::BlobWriteFailed {
            name: suggested_name.to_string(),
            detail: e.to_string(),
        })?;
        debug!("Stored {} bytes at {}", bytes.len(), path.display());
        Ok(path)
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>, ConvertError> {
        std::fs::read(path).map_err(|e| ConvertError::BlobReadFailed {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })
    }
}

// ── In-memory record store ───────────────────────────────────────────────

/// Record store backed by an in-process map.
///
/// The single mutex makes every operation atomic with respect to the
/// others, which is all the pipeline requires. Ids are assigned
/// sequentially starting at 1.
#[derive(Default)]
pub struct MemoryRecordStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    next_id: u64,
    records: BTreeMap<u64, ConversionRecord>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryRecordStore {
    fn create(&self, draft: RecordDraft) -> Result<ConversionRecord, ConvertError> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| ConvertError::RecordStoreFailed("record store poisoned".into()))?;
        inner.next_id += 1;
        let id = inner.next_id;
        let record = ConversionRecord::from_draft(id, draft);
        inner.records.insert(id, record.clone());
        Ok(record)
    }

    fn get(&self, id: u64) -> Result<Option<ConversionRecord>, ConvertError> {
        let inner = self
            .inner
            .lock()
            .map_err(|_| ConvertError::RecordStoreFailed("record store poisoned".into()))?;
        Ok(inner.records.get(&id).cloned())
    }

    fn list(&self) -> Result<Vec<ConversionRecord>, ConvertError> {
        let inner = self
            .inner
            .lock()
            .map_err(|_| ConvertError::RecordStoreFailed("record store poisoned".into()))?;
        Ok(inner.records.values().cloned().collect())
    }

    fn set_json(&self, id: u64, json: &str) -> Result<(), ConvertError> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| ConvertError::RecordStoreFailed("record store poisoned".into()))?;
        match inner.records.get_mut(&id) {
            Some(record) => {
                record.json_data = Some(json.to_string());
                Ok(())
            }
            None => Err(ConvertError::RecordNotFound { id }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn draft(name: &str) -> RecordDraft {
        RecordDraft {
            file_name: name.to_string(),
            media_type: "application/pdf".into(),
            size_bytes: 10,
            stored_path: PathBuf::from("/tmp/blob.pdf"),
            created_at: Utc::now(),
            json_data: None,
        }
    }

    #[test]
    fn fs_blob_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path().join("blobs"));
        let path = store.write(b"hello", "x.bin").unwrap();
        assert!(path.ends_with("x.bin"));
        assert_eq!(store.read(&path).unwrap(), b"hello");
    }

    #[test]
    fn fs_blob_store_read_missing_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path());
        let err = store.read(Path::new("/nonexistent/blob.bin"));
        assert!(matches!(err, Err(ConvertError::BlobReadFailed { .. })));
    }

    #[test]
    fn memory_store_assigns_sequential_ids() {
        let store = MemoryRecordStore::new();
        let a = store.create(draft("a.pdf")).unwrap();
        let b = store.create(draft("b.pdf")).unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(store.list().unwrap().len(), 2);
    }

    #[test]
    fn memory_store_get_absent_is_none() {
        let store = MemoryRecordStore::new();
        assert!(store.get(99).unwrap().is_none());
    }

    #[test]
    fn set_json_overwrites_only_json_field() {
        let store = MemoryRecordStore::new();
        let created = store.create(draft("a.pdf")).unwrap();
        store.set_json(created.id, "{\"k\":1}").unwrap();
        let fetched = store.get(created.id).unwrap().unwrap();
        assert_eq!(fetched.json_data.as_deref(), Some("{\"k\":1}"));
        assert_eq!(fetched.file_name, created.file_name);
        assert_eq!(fetched.created_at, created.created_at);
    }

    #[test]
    fn set_json_on_missing_record_fails() {
        let store = MemoryRecordStore::new();
        assert!(matches!(
            store.set_json(5, "{}"),
            Err(ConvertError::RecordNotFound { id: 5 })
        ));
    }
}
