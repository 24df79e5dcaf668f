//! Ephemeral study state and the pure derivation of what the user sees.
//!
//! Nothing here touches the stored card order; search and shuffle only
//! change the derived sequence.

use std::collections::HashMap;

use crate::model::card::Card;
use crate::model::ids::CardId;

/// Constrains `index` into `[0, max(0, len - 1)]`.
#[must_use]
pub const fn clamp_index(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    if index >= len {
        return len - 1;
    }
    index
}

/// Case-insensitive substring filter on front or back.
///
/// A blank term returns every card in stored order.
#[must_use]
pub fn filter_cards<'a>(cards: &'a [Card], term: &str) -> Vec<&'a Card> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return cards.iter().collect();
    }
    cards
        .iter()
        .filter(|card| card.matches_lowercase(&needle))
        .collect()
}

/// Re-orders `filtered` by a stored shuffle order.
///
/// Ids missing from `filtered` are skipped and cards missing from `order`
/// are left out; the last shuffle decides membership.
#[must_use]
pub fn order_by_session<'a>(filtered: Vec<&'a Card>, order: Option<&[CardId]>) -> Vec<&'a Card> {
    let Some(order) = order else {
        return filtered;
    };
    let by_id: HashMap<&CardId, &'a Card> =
        filtered.into_iter().map(|card| (card.id(), card)).collect();
    order.iter().filter_map(|id| by_id.get(id).copied()).collect()
}

//
// ─── SESSION STATE ─────────────────────────────────────────────────────────────
//

/// Per-run study state. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    search_term: String,
    session_order: Option<Vec<CardId>>,
    active_card_index: usize,
    is_flipped: bool,
}

impl SessionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    #[must_use]
    pub fn session_order(&self) -> Option<&[CardId]> {
        self.session_order.as_deref()
    }

    /// Raw stored index; read through [`SessionView::active_index`] for the clamped value.
    #[must_use]
    pub fn active_card_index(&self) -> usize {
        self.active_card_index
    }

    #[must_use]
    pub fn is_flipped(&self) -> bool {
        self.is_flipped
    }

    /// Back to defaults, search term included.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Drops the shuffle order and returns to the first card, keeping the search term.
    pub fn reset_position(&mut self) {
        self.session_order = None;
        self.active_card_index = 0;
        self.is_flipped = false;
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.reset_position();
    }

    /// Stores a shuffle order and starts again from its first card.
    pub fn apply_order(&mut self, order: Vec<CardId>) {
        self.session_order = Some(order);
        self.active_card_index = 0;
        self.is_flipped = false;
    }

    pub fn unflip(&mut self) {
        self.is_flipped = false;
    }

    /// Toggles the flip state and returns the new value.
    pub fn flip(&mut self) -> bool {
        self.is_flipped = !self.is_flipped;
        self.is_flipped
    }

    /// Advances with wraparound. Returns false for an empty session.
    pub fn next(&mut self, len: usize) -> bool {
        if len == 0 {
            return false;
        }
        self.active_card_index = (clamp_index(self.active_card_index, len) + 1) % len;
        self.is_flipped = false;
        true
    }

    /// Steps back with wraparound. Returns false for an empty session.
    pub fn prev(&mut self, len: usize) -> bool {
        if len == 0 {
            return false;
        }
        self.active_card_index = (clamp_index(self.active_card_index, len) + len - 1) % len;
        self.is_flipped = false;
        true
    }

    /// Cards matching the current search term, in stored order.
    #[must_use]
    pub fn filtered<'a>(&self, cards: &'a [Card]) -> Vec<&'a Card> {
        filter_cards(cards, &self.search_term)
    }

    /// Derives the visible session from the active deck's cards.
    #[must_use]
    pub fn view<'a>(&self, cards: &'a [Card]) -> SessionView<'a> {
        let cards = order_by_session(self.filtered(cards), self.session_order());
        let active_index = clamp_index(self.active_card_index, cards.len());
        SessionView {
            cards,
            active_index,
            is_searching: !self.search_term.is_empty(),
        }
    }
}

//
// ─── SESSION VIEW ──────────────────────────────────────────────────────────────
//

/// The derived sequence the user is studying, with a clamped index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView<'a> {
    cards: Vec<&'a Card>,
    active_index: usize,
    is_searching: bool,
}

impl<'a> SessionView<'a> {
    #[must_use]
    pub fn cards(&self) -> &[&'a Card] {
        &self.cards
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn active_index(&self) -> usize {
        self.active_index
    }

    #[must_use]
    pub fn is_searching(&self) -> bool {
        self.is_searching
    }

    #[must_use]
    pub fn current(&self) -> Option<&'a Card> {
        self.cards.get(self.active_index).copied()
    }

    /// One-based position and total, or `None` for an empty session.
    #[must_use]
    pub fn position(&self) -> Option<(usize, usize)> {
        if self.cards.is_empty() {
            return None;
        }
        Some((self.active_index + 1, self.cards.len()))
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
