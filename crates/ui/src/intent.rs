use lotus_core::model::DeckId;

/// Everything the study screen can be asked to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StudyIntent {
    SelectDeck(DeckId),
    CreateDeck(String),
    RenameDeck(String),
    /// Ask for confirmation before deleting the active deck.
    RequestDeleteDeck,
    ConfirmDelete(bool),
    CreateCard { front: String, back: String },
    /// Raw keystroke-level input; applied once typing pauses.
    SearchInput(String),
    /// A search term that has passed the debounce window.
    SearchSettled(String),
    Shuffle,
    Flip,
    Next,
    Prev,
}
