#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod library_service;
pub mod search_debounce;
pub mod seed;
pub mod study_service;

pub use lotus_core::Clock;

pub use error::{AppServicesError, LibraryError};
pub use library_service::{IgnoredReason, LibraryService, MutationOutcome};
pub use search_debounce::{DEFAULT_SEARCH_DEBOUNCE, SearchDebouncer};
pub use study_service::StudyService;
