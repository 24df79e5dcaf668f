mod deck_vm;
mod study_vm;

pub use deck_vm::{DeckListEntryVm, map_deck_list};
pub use study_vm::{EmptyState, StudyVm, format_position, map_study_vm};
