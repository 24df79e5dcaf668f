#![forbid(unsafe_code)]

pub mod intent;
pub mod screen;
pub mod vm;

pub use intent::StudyIntent;
pub use screen::StudyScreen;
pub use vm::{DeckListEntryVm, EmptyState, StudyVm, map_study_vm};
