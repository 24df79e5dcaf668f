use std::sync::Arc;

use lotus_core::model::Document;

use crate::codec::{decode_document, encode_document};
use crate::repository::{SnapshotRepository, Storage, StorageError};

/// Key under which the whole document snapshot is stored.
pub const STORAGE_KEY: &str = "lotusFlashcards_v1";

/// Result of reading the stored document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(Document),
    /// Nothing usable was stored; callers treat this as a fresh install.
    NotFound,
}

impl LoadOutcome {
    #[must_use]
    pub fn into_document(self) -> Option<Document> {
        match self {
            Self::Loaded(document) => Some(document),
            Self::NotFound => None,
        }
    }
}

/// Loads and saves the full document snapshot under a single key.
#[derive(Clone)]
pub struct DocumentPersistence {
    key: String,
    snapshots: Arc<dyn SnapshotRepository>,
}

impl DocumentPersistence {
    #[must_use]
    pub fn new(snapshots: Arc<dyn SnapshotRepository>) -> Self {
        Self::with_key(snapshots, STORAGE_KEY)
    }

    #[must_use]
    pub fn with_key(snapshots: Arc<dyn SnapshotRepository>, key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            snapshots,
        }
    }

    #[must_use]
    pub fn from_storage(storage: &Storage) -> Self {
        Self::new(Arc::clone(&storage.snapshots))
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the stored document.
    ///
    /// Never fails: read errors, a missing key and undecodable text all come
    /// back as `LoadOutcome::NotFound`.
    pub async fn load(&self) -> LoadOutcome {
        let raw = match self.snapshots.read(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return LoadOutcome::NotFound,
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "snapshot read failed");
                return LoadOutcome::NotFound;
            }
        };

        match decode_document(&raw) {
            Some(document) => LoadOutcome::Loaded(document),
            None => LoadOutcome::NotFound,
        }
    }

    /// Overwrite the stored snapshot with the full document.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if encoding or the write fails.
    pub async fn save(&self, document: &Document) -> Result<(), StorageError> {
        let raw = encode_document(document)?;
        self.snapshots.write(&self.key, &raw).await?;
        tracing::debug!(key = %self.key, bytes = raw.len(), "snapshot saved");
        Ok(())
    }
}
