//! Bootstrapping of the study service against a storage backend.

use lotus_core::Clock;
use storage::{DocumentPersistence, Storage};

use crate::error::AppServicesError;
use crate::library_service::LibraryService;
use crate::study_service::StudyService;

/// Open (and seed if needed) the document stored in `SQLite`.
///
/// # Errors
///
/// Returns `AppServicesError::Sqlite` if the database cannot be opened or migrated.
pub async fn open_sqlite(db_url: &str, clock: Clock) -> Result<StudyService, AppServicesError> {
    let storage = Storage::sqlite(db_url).await?;
    Ok(open_with_storage(&storage, clock).await)
}

/// Study service over a fresh in-memory backend.
pub async fn open_in_memory(clock: Clock) -> StudyService {
    open_with_storage(&Storage::in_memory(), clock).await
}

pub async fn open_with_storage(storage: &Storage, clock: Clock) -> StudyService {
    let persistence = DocumentPersistence::from_storage(storage);
    let library = LibraryService::open(clock, persistence).await;
    StudyService::new(library)
}
