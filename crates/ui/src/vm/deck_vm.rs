use lotus_core::model::{DeckId, Document};

/// UI-ready entry of the deck sidebar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeckListEntryVm {
    pub id: DeckId,
    pub name: String,
    pub is_active: bool,
}

/// Decks in display order with the active one marked.
#[must_use]
pub fn map_deck_list(document: &Document) -> Vec<DeckListEntryVm> {
    let active = document.active_deck_id();
    document
        .decks()
        .iter()
        .map(|deck| DeckListEntryVm {
            id: deck.id().clone(),
            name: deck.name().to_owned(),
            is_active: active == Some(deck.id()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lotus_core::model::Deck;
    use lotus_core::time::fixed_now;

    #[test]
    fn marks_only_the_active_deck() {
        let mut doc = Document::new();
        doc.add_deck(Deck::new(DeckId::generate(), "A", fixed_now()).unwrap())
            .unwrap();
        doc.add_deck(Deck::new(DeckId::generate(), "B", fixed_now()).unwrap())
            .unwrap();

        let entries = map_deck_list(&doc);
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert!(!entries[0].is_active);
        assert!(entries[1].is_active);
    }

    #[test]
    fn empty_document_has_no_entries() {
        assert!(map_deck_list(&Document::new()).is_empty());
    }
}
