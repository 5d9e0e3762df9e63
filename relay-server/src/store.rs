//! In-memory file storage.
//!
//! Files live in one of two sets: `pending` (metadata accepted, body not yet
//! uploaded) and `ready` (body complete, downloadable). An id is in at most
//! one set at a time. Moving a file from pending to ready is a claim followed
//! by a publish, and only one caller can ever claim a given id.
//!
//! ```text
//! create ──► pending ──claim──► (uploading) ──publish──► ready
//!                                    │
//!                                    └── failed / cancelled: dropped
//! ```

use bytes::Bytes;
use relay_types::{FileId, FileMetadata};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A stored file: metadata plus its ciphertext chunks in upload order.
#[derive(Debug)]
pub struct FileRecord {
    meta: FileMetadata,
    chunks: Vec<Bytes>,
    downloads: AtomicU64,
}

impl FileRecord {
    /// Create an empty record for freshly accepted metadata.
    pub fn new(meta: FileMetadata) -> Self {
        Self {
            meta,
            chunks: Vec::new(),
            downloads: AtomicU64::new(0),
        }
    }

    /// Declared plaintext size.
    pub fn size(&self) -> u64 {
        self.meta.size
    }

    /// Append one ciphertext chunk.
    pub fn push_chunk(&mut self, chunk: Bytes) {
        self.chunks.push(chunk);
    }

    /// Stored chunks in order.
    pub fn chunks(&self) -> &[Bytes] {
        &self.chunks
    }

    /// Total stored ciphertext bytes.
    pub fn stored_bytes(&self) -> u64 {
        self.chunks.iter().map(|c| c.len() as u64).sum()
    }

    /// Count one completed download.
    pub fn record_download(&self) -> u64 {
        self.downloads.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Metadata with the current download count filled in.
    pub fn metadata(&self) -> FileMetadata {
        FileMetadata {
            downloads: self.downloads.load(Ordering::Relaxed),
            ..self.meta.clone()
        }
    }
}

/// A mutex-guarded map from file id to record.
///
/// The lock is held for one map operation only.
#[derive(Debug)]
pub struct FileSet<V> {
    files: Mutex<HashMap<FileId, V>>,
}

impl<V> Default for FileSet<V> {
    fn default() -> Self {
        Self {
            files: Mutex::new(HashMap::new()),
        }
    }
}

impl<V> FileSet<V> {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    // A panic mid-operation cannot leave the map half-updated, so a
    // poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, HashMap<FileId, V>> {
        self.files.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert or replace the value for `id`.
    pub fn set(&self, id: FileId, value: V) {
        self.lock().insert(id, value);
    }

    /// Remove and return the value for `id`.
    pub fn remove(&self, id: &FileId) -> Option<V> {
        self.lock().remove(id)
    }

    /// Number of entries.
    pub(crate) fn len(&self) -> usize {
        self.lock().len()
    }
}

impl<V: Clone> FileSet<V> {
    /// Clone out the value for `id`.
    pub fn get(&self, id: &FileId) -> Option<V> {
        self.lock().get(id).cloned()
    }

    /// Clone out every value.
    pub fn snapshot(&self) -> Vec<V> {
        self.lock().values().cloned().collect()
    }
}

/// Pending and ready files of one relay.
#[derive(Debug, Default)]
pub struct FileStore {
    pending: FileSet<FileRecord>,
    ready: FileSet<Arc<FileRecord>>,
}

impl FileStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new file awaiting its body.
    pub fn create_pending(&self, id: FileId, meta: FileMetadata) {
        self.pending.set(id, FileRecord::new(meta));
    }

    /// Take ownership of a pending file for upload.
    ///
    /// Returns `None` if the id is unknown or already claimed. The record is
    /// no longer pending once this returns.
    pub fn claim_pending(&self, id: &FileId) -> Option<FileRecord> {
        self.pending.remove(id)
    }

    /// Make a fully uploaded file downloadable.
    pub fn publish_ready(&self, id: FileId, record: FileRecord) -> Arc<FileRecord> {
        let record = Arc::new(record);
        self.ready.set(id, record.clone());
        record
    }

    /// Look up a downloadable file.
    pub fn get_ready(&self, id: &FileId) -> Option<Arc<FileRecord>> {
        self.ready.get(id)
    }

    /// All downloadable files, in no particular order.
    pub fn list_ready(&self) -> Vec<Arc<FileRecord>> {
        self.ready.snapshot()
    }

    /// Number of files awaiting upload.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Number of downloadable files.
    pub fn ready_count(&self) -> usize {
        self.ready.len()
    }
}
