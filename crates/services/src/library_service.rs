use lotus_core::model::{
    Card, CardError, CardId, Deck, DeckError, DeckId, Document, DocumentError,
};
use storage::DocumentPersistence;

use crate::Clock;
use crate::error::LibraryError;
use crate::seed::seed_if_empty;

/// Why a document operation left everything untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum IgnoredReason {
    EmptyName,
    EmptyFront,
    EmptyBack,
    NoActiveDeck,
    UnknownDeck,
    /// The user did not confirm a destructive action.
    Declined,
    Invalid,
}

/// Result of a document operation that did not hit a storage error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The document changed and was saved.
    Applied,
    /// Nothing changed and nothing was saved.
    Ignored(IgnoredReason),
}

impl MutationOutcome {
    #[must_use]
    pub fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

fn ignored(err: &DocumentError) -> MutationOutcome {
    let reason = match err {
        DocumentError::NoActiveDeck => IgnoredReason::NoActiveDeck,
        DocumentError::UnknownDeck(_) => IgnoredReason::UnknownDeck,
        DocumentError::Deck(DeckError::EmptyName) => IgnoredReason::EmptyName,
        DocumentError::Card(CardError::EmptyFront) => IgnoredReason::EmptyFront,
        DocumentError::Card(CardError::EmptyBack) => IgnoredReason::EmptyBack,
        _ => IgnoredReason::Invalid,
    };
    tracing::debug!(error = %err, ?reason, "mutation ignored");
    MutationOutcome::Ignored(reason)
}

/// Owns the study document and saves it after every applied mutation.
pub struct LibraryService {
    clock: Clock,
    persistence: DocumentPersistence,
    document: Document,
}

impl LibraryService {
    #[must_use]
    pub fn new(clock: Clock, persistence: DocumentPersistence, document: Document) -> Self {
        Self {
            clock,
            persistence,
            document,
        }
    }

    /// Load the stored document, seeding the demo deck when it has no decks.
    ///
    /// Never fails: unreadable storage starts from an empty document, and a
    /// failed seed save is logged and retried on the next mutation.
    pub async fn open(clock: Clock, persistence: DocumentPersistence) -> Self {
        let document = persistence.load().await.into_document().unwrap_or_default();
        let mut service = Self::new(clock, persistence, document);

        if seed_if_empty(&mut service.document, clock.now()) {
            tracing::info!("seeded demo deck");
            if let Err(err) = service.persistence.save(&service.document).await {
                tracing::warn!(error = %err, "failed to save seeded document");
            }
        }
        service
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Create a deck, append it and make it active.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Storage` if the applied change cannot be saved.
    pub async fn create_deck(&mut self, name: &str) -> Result<MutationOutcome, LibraryError> {
        let deck = match Deck::new(DeckId::generate(), name, self.clock.now()) {
            Ok(deck) => deck,
            Err(err) => return Ok(ignored(&err.into())),
        };
        let id = deck.id().clone();
        if let Err(err) = self.document.add_deck(deck) {
            return Ok(ignored(&err));
        }
        tracing::debug!(deck_id = %id, "deck created");
        self.commit().await
    }

    /// Rename the active deck.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Storage` if the applied change cannot be saved.
    pub async fn rename_active_deck(&mut self, name: &str) -> Result<MutationOutcome, LibraryError> {
        if let Err(err) = self.document.rename_active_deck(name) {
            return Ok(ignored(&err));
        }
        self.commit().await
    }

    /// Delete the active deck and its cards once `confirm` agrees.
    ///
    /// `confirm` is only asked when there is an active deck.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Storage` if the applied change cannot be saved.
    pub async fn delete_active_deck(
        &mut self,
        confirm: impl FnOnce(&Deck) -> bool,
    ) -> Result<MutationOutcome, LibraryError> {
        let Some(deck) = self.document.active_deck() else {
            return Ok(MutationOutcome::Ignored(IgnoredReason::NoActiveDeck));
        };
        if !confirm(deck) {
            return Ok(MutationOutcome::Ignored(IgnoredReason::Declined));
        }

        match self.document.remove_active_deck() {
            Ok(removed) => tracing::debug!(deck_id = %removed.id(), "deck deleted"),
            Err(err) => return Ok(ignored(&err)),
        }
        self.commit().await
    }

    /// Append a card to the active deck.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Storage` if the applied change cannot be saved.
    pub async fn create_card(
        &mut self,
        front: &str,
        back: &str,
    ) -> Result<MutationOutcome, LibraryError> {
        if self.document.active_deck().is_none() {
            return Ok(MutationOutcome::Ignored(IgnoredReason::NoActiveDeck));
        }
        let card = match Card::new(CardId::generate(), front, back, self.clock.now()) {
            Ok(card) => card,
            Err(err) => return Ok(ignored(&err.into())),
        };
        if let Err(err) = self.document.add_card_to_active(card) {
            return Ok(ignored(&err));
        }
        self.commit().await
    }

    /// Make another deck active.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Storage` if the applied change cannot be saved.
    pub async fn select_deck(&mut self, id: &DeckId) -> Result<MutationOutcome, LibraryError> {
        if let Err(err) = self.document.select_deck(id) {
            return Ok(ignored(&err));
        }
        self.commit().await
    }

    async fn commit(&self) -> Result<MutationOutcome, LibraryError> {
        if let Err(err) = self.persistence.save(&self.document).await {
            tracing::warn!(error = %err, "document changed in memory but was not saved");
            return Err(err.into());
        }
        Ok(MutationOutcome::Applied)
    }
}
