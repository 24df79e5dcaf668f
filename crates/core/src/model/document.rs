use std::collections::{BTreeMap, HashSet};

use thiserror::Error;

use crate::model::card::{Card, CardError};
use crate::model::deck::{Deck, DeckError};
use crate::model::ids::{CardId, DeckId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DocumentError {
    #[error("no active deck")]
    NoActiveDeck,

    #[error("unknown deck: {0}")]
    UnknownDeck(DeckId),

    #[error("deck already exists: {0}")]
    DuplicateDeck(DeckId),

    #[error("card already exists: {0}")]
    DuplicateCard(CardId),

    #[error(transparent)]
    Deck(#[from] DeckError),

    #[error(transparent)]
    Card(#[from] CardError),
}

//
// ─── DOCUMENT ──────────────────────────────────────────────────────────────────
//

/// All persisted study data: decks in display order, their cards, and the
/// active deck pointer.
///
/// Invariants held by every value of this type:
/// - every deck has a card list and every card list belongs to a deck
/// - the active deck, when set, exists
/// - deck ids are unique, and card ids are unique across the document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    decks: Vec<Deck>,
    cards_by_deck_id: BTreeMap<DeckId, Vec<Card>>,
    active_deck_id: Option<DeckId>,
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a document from loosely related parts, repairing the invariants.
    ///
    /// Duplicate decks and cards keep their first occurrence, card lists of
    /// unknown decks are dropped, and a dangling active deck falls back to the
    /// first deck.
    #[must_use]
    pub fn from_parts(
        decks: Vec<Deck>,
        mut cards_by_deck_id: BTreeMap<DeckId, Vec<Card>>,
        active_deck_id: Option<DeckId>,
    ) -> Self {
        let mut seen_decks = HashSet::new();
        let decks: Vec<Deck> = decks
            .into_iter()
            .filter(|deck| seen_decks.insert(deck.id().clone()))
            .collect();

        let mut seen_cards = HashSet::new();
        let mut repaired = BTreeMap::new();
        for deck in &decks {
            let cards = cards_by_deck_id
                .remove(deck.id())
                .unwrap_or_default()
                .into_iter()
                .filter(|card| seen_cards.insert(card.id().clone()))
                .collect();
            repaired.insert(deck.id().clone(), cards);
        }

        let active_deck_id = match active_deck_id {
            Some(id) if seen_decks.contains(&id) => Some(id),
            Some(_) => decks.first().map(|deck| deck.id().clone()),
            None => None,
        };

        Self {
            decks,
            cards_by_deck_id: repaired,
            active_deck_id,
        }
    }

    // Accessors
    #[must_use]
    pub fn decks(&self) -> &[Deck] {
        &self.decks
    }

    #[must_use]
    pub fn cards_by_deck_id(&self) -> &BTreeMap<DeckId, Vec<Card>> {
        &self.cards_by_deck_id
    }

    #[must_use]
    pub fn active_deck_id(&self) -> Option<&DeckId> {
        self.active_deck_id.as_ref()
    }

    #[must_use]
    pub fn has_decks(&self) -> bool {
        !self.decks.is_empty()
    }

    #[must_use]
    pub fn deck(&self, id: &DeckId) -> Option<&Deck> {
        self.decks.iter().find(|deck| deck.id() == id)
    }

    #[must_use]
    pub fn active_deck(&self) -> Option<&Deck> {
        self.active_deck_id.as_ref().and_then(|id| self.deck(id))
    }

    /// Cards of the given deck in insertion order; empty for unknown decks.
    #[must_use]
    pub fn cards(&self, id: &DeckId) -> &[Card] {
        self.cards_by_deck_id
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Cards of the active deck; empty when no deck is active.
    #[must_use]
    pub fn active_cards(&self) -> &[Card] {
        self.active_deck_id
            .as_ref()
            .map(|id| self.cards(id))
            .unwrap_or_default()
    }

    fn contains_card(&self, id: &CardId) -> bool {
        self.cards_by_deck_id
            .values()
            .flatten()
            .any(|card| card.id() == id)
    }

    // Mutations

    /// Appends a deck with an empty card list and makes it active.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::DuplicateDeck` if the id is already in use.
    pub fn add_deck(&mut self, deck: Deck) -> Result<(), DocumentError> {
        if self.deck(deck.id()).is_some() {
            return Err(DocumentError::DuplicateDeck(deck.id().clone()));
        }
        let id = deck.id().clone();
        self.decks.push(deck);
        self.cards_by_deck_id.insert(id.clone(), Vec::new());
        self.active_deck_id = Some(id);
        Ok(())
    }

    /// Makes an existing deck active.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::UnknownDeck` if no deck has this id.
    pub fn select_deck(&mut self, id: &DeckId) -> Result<(), DocumentError> {
        if self.deck(id).is_none() {
            return Err(DocumentError::UnknownDeck(id.clone()));
        }
        self.active_deck_id = Some(id.clone());
        Ok(())
    }

    /// Renames the active deck in place.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::NoActiveDeck` or `DocumentError::Deck` for a
    /// blank name.
    pub fn rename_active_deck(&mut self, name: &str) -> Result<(), DocumentError> {
        let id = self
            .active_deck_id
            .clone()
            .ok_or(DocumentError::NoActiveDeck)?;
        let deck = self
            .decks
            .iter_mut()
            .find(|deck| deck.id() == &id)
            .ok_or(DocumentError::NoActiveDeck)?;
        deck.rename(name)?;
        Ok(())
    }

    /// Removes the active deck and its cards, then activates the first
    /// remaining deck (or none).
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::NoActiveDeck` when there is nothing to delete.
    pub fn remove_active_deck(&mut self) -> Result<Deck, DocumentError> {
        let id = self
            .active_deck_id
            .take()
            .ok_or(DocumentError::NoActiveDeck)?;
        let Some(index) = self.decks.iter().position(|deck| deck.id() == &id) else {
            self.active_deck_id = self.decks.first().map(|deck| deck.id().clone());
            return Err(DocumentError::NoActiveDeck);
        };

        let removed = self.decks.remove(index);
        self.cards_by_deck_id.remove(&id);
        self.active_deck_id = self.decks.first().map(|deck| deck.id().clone());
        Ok(removed)
    }

    /// Appends a card to the active deck.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::NoActiveDeck` or `DocumentError::DuplicateCard`.
    pub fn add_card_to_active(&mut self, card: Card) -> Result<(), DocumentError> {
        let id = self
            .active_deck_id
            .clone()
            .ok_or(DocumentError::NoActiveDeck)?;
        if self.contains_card(card.id()) {
            return Err(DocumentError::DuplicateCard(card.id().clone()));
        }
        self.cards_by_deck_id.entry(id).or_default().push(card);
        Ok(())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
