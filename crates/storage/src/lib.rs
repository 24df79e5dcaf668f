#![forbid(unsafe_code)]

pub mod codec;
pub mod persistence;
pub mod repository;
pub mod sqlite;

pub use persistence::{DocumentPersistence, LoadOutcome, STORAGE_KEY};
pub use repository::{InMemoryRepository, SnapshotRepository, Storage, StorageError};
