use lotus_core::model::{CardId, DeckId, Document, SessionState, SessionView};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::LibraryError;
use crate::library_service::{LibraryService, MutationOutcome};

/// Applied-but-unsaved changes still count as applied.
fn was_applied(result: &Result<MutationOutcome, LibraryError>) -> bool {
    match result {
        Ok(outcome) => outcome.is_applied(),
        Err(_) => true,
    }
}

/// Single owner of the document and the ephemeral study session.
///
/// Every document operation persists first, then adjusts the session:
/// - deck create/rename/delete drop the shuffle order and return to the first card
/// - switching decks also clears the search term
/// - creating a card keeps an active shuffle order
///
/// Any change other than `flip` turns the current card face up.
pub struct StudyService {
    library: LibraryService,
    session: SessionState,
}

impl StudyService {
    #[must_use]
    pub fn new(library: LibraryService) -> Self {
        Self {
            library,
            session: SessionState::new(),
        }
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        self.library.document()
    }

    #[must_use]
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// The cards currently being studied, derived on demand.
    #[must_use]
    pub fn view(&self) -> SessionView<'_> {
        self.session.view(self.library.document().active_cards())
    }

    // Document operations

    /// # Errors
    ///
    /// Returns `LibraryError` if the applied change cannot be saved.
    pub async fn create_deck(&mut self, name: &str) -> Result<MutationOutcome, LibraryError> {
        let result = self.library.create_deck(name).await;
        if was_applied(&result) {
            self.session.reset_position();
        }
        result
    }

    /// # Errors
    ///
    /// Returns `LibraryError` if the applied change cannot be saved.
    pub async fn rename_active_deck(&mut self, name: &str) -> Result<MutationOutcome, LibraryError> {
        let result = self.library.rename_active_deck(name).await;
        if was_applied(&result) {
            self.session.reset_position();
        }
        result
    }

    /// # Errors
    ///
    /// Returns `LibraryError` if the applied change cannot be saved.
    pub async fn delete_active_deck(
        &mut self,
        confirm: impl FnOnce(&lotus_core::model::Deck) -> bool,
    ) -> Result<MutationOutcome, LibraryError> {
        let result = self.library.delete_active_deck(confirm).await;
        if was_applied(&result) {
            self.session.reset_position();
        }
        result
    }

    /// # Errors
    ///
    /// Returns `LibraryError` if the applied change cannot be saved.
    pub async fn create_card(
        &mut self,
        front: &str,
        back: &str,
    ) -> Result<MutationOutcome, LibraryError> {
        let result = self.library.create_card(front, back).await;
        if was_applied(&result) {
            self.session.unflip();
        }
        result
    }

    /// # Errors
    ///
    /// Returns `LibraryError` if the applied change cannot be saved.
    pub async fn select_deck(&mut self, id: &DeckId) -> Result<MutationOutcome, LibraryError> {
        let result = self.library.select_deck(id).await;
        if was_applied(&result) {
            self.session.reset();
        }
        result
    }

    // Session operations

    /// Replace the search term; drops any shuffle order.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.session.set_search_term(term);
    }

    /// Shuffle the currently filtered cards with the thread-local generator.
    pub fn shuffle(&mut self) {
        self.shuffle_with(&mut rand::rng());
    }

    /// Shuffle the currently filtered cards. Stored card order is untouched.
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut ids: Vec<CardId> = self
            .session
            .filtered(self.library.document().active_cards())
            .into_iter()
            .map(|card| card.id().clone())
            .collect();
        ids.shuffle(rng);
        tracing::debug!(cards = ids.len(), "session shuffled");
        self.session.apply_order(ids);
    }

    /// Returns false when there is nothing to move through.
    pub fn next(&mut self) -> bool {
        let len = self.view().len();
        self.session.next(len)
    }

    /// Returns false when there is nothing to move through.
    pub fn prev(&mut self) -> bool {
        let len = self.view().len();
        self.session.prev(len)
    }

    /// Toggles the current card and returns the new flip state.
    pub fn flip(&mut self) -> bool {
        self.session.flip()
    }
}
