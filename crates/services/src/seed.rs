use chrono::{DateTime, Utc};
use lotus_core::model::{Card, CardId, Deck, DeckId, Document};

/// Name of the deck created on first launch.
pub const DEMO_DECK_NAME: &str = "White Lotus — Self Love";

/// Front/back pairs of the first-launch deck.
pub const DEMO_CARDS: [(&str, &str); 5] = [
    ("I am worthy.", "I deserve love, peace, and good things."),
    ("I am safe.", "My mind and body can relax right now."),
    ("I can do hard things.", "Step by step, I always figure it out."),
    ("I am protected.", "I trust myself and my path."),
    ("I bloom in my own time.", "No rushing. My growth is real."),
];

/// Adds the demo deck (active) and its cards when the document has no decks.
///
/// Returns true when the document was seeded.
pub fn seed_if_empty(document: &mut Document, now: DateTime<Utc>) -> bool {
    if document.has_decks() {
        return false;
    }

    let Ok(deck) = Deck::new(DeckId::generate(), DEMO_DECK_NAME, now) else {
        return false;
    };
    if document.add_deck(deck).is_err() {
        return false;
    }
    for (front, back) in DEMO_CARDS {
        if let Ok(card) = Card::new(CardId::generate(), front, back, now) {
            // Fresh ids cannot collide.
            let _ = document.add_card_to_active(card);
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use lotus_core::time::fixed_now;

    #[test]
    fn seeds_empty_document() {
        let mut doc = Document::new();
        assert!(seed_if_empty(&mut doc, fixed_now()));

        assert_eq!(doc.decks().len(), 1);
        let deck = doc.active_deck().unwrap();
        assert_eq!(deck.name(), DEMO_DECK_NAME);
        assert_eq!(doc.active_cards().len(), 5);
        assert_eq!(doc.active_cards()[0].front(), "I am worthy.");
    }

    #[test]
    fn leaves_existing_decks_alone() {
        let mut doc = Document::new();
        doc.add_deck(Deck::new(DeckId::generate(), "Mine", fixed_now()).unwrap())
            .unwrap();
        assert!(!seed_if_empty(&mut doc, fixed_now()));
        assert_eq!(doc.decks().len(), 1);
        assert_eq!(doc.decks()[0].name(), "Mine");
    }
}
