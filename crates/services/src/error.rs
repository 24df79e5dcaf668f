//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `LibraryService` mutations.
///
/// Every variant means the change was applied in memory but could not be
/// saved; callers surface it as a recoverable warning.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LibraryError {
    #[error("change applied but not saved: {0}")]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
