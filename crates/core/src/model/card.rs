use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::CardId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CardError {
    #[error("card front cannot be empty")]
    EmptyFront,

    #[error("card back cannot be empty")]
    EmptyBack,
}

//
// ─── CARD ──────────────────────────────────────────────────────────────────────
//

/// A front/back text pair. Both sides are stored trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    id: CardId,
    front: String,
    back: String,
    updated_at: DateTime<Utc>,
}

impl Card {
    /// Creates a new card.
    ///
    /// # Errors
    ///
    /// Returns `CardError::EmptyFront` or `CardError::EmptyBack` when a side
    /// is empty after trimming. The front is checked first.
    pub fn new(
        id: CardId,
        front: impl AsRef<str>,
        back: impl AsRef<str>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, CardError> {
        let front = front.as_ref().trim();
        if front.is_empty() {
            return Err(CardError::EmptyFront);
        }
        let back = back.as_ref().trim();
        if back.is_empty() {
            return Err(CardError::EmptyBack);
        }

        Ok(Self {
            id,
            front: front.to_owned(),
            back: back.to_owned(),
            updated_at,
        })
    }

    #[must_use]
    pub fn id(&self) -> &CardId {
        &self.id
    }

    #[must_use]
    pub fn front(&self) -> &str {
        &self.front
    }

    #[must_use]
    pub fn back(&self) -> &str {
        &self.back
    }

    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Case-insensitive substring match on either side.
    ///
    /// `needle` must already be lowercased.
    #[must_use]
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.front.to_lowercase().contains(needle) || self.back.to_lowercase().contains(needle)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn card_fails_if_front_empty() {
        let err = Card::new(CardId::generate(), "   ", "ok", fixed_now()).unwrap_err();
        assert_eq!(err, CardError::EmptyFront);
    }

    #[test]
    fn card_fails_if_back_empty() {
        let err = Card::new(CardId::generate(), "ok", " \n", fixed_now()).unwrap_err();
        assert_eq!(err, CardError::EmptyBack);
    }

    #[test]
    fn card_sides_are_trimmed() {
        let card = Card::new(CardId::generate(), "  hola ", " hello", fixed_now()).unwrap();
        assert_eq!(card.front(), "hola");
        assert_eq!(card.back(), "hello");
    }

    #[test]
    fn matches_either_side_ignoring_case() {
        let card = Card::new(CardId::generate(), "I am Safe.", "My MIND can relax", fixed_now())
            .unwrap();
        assert!(card.matches_lowercase("safe"));
        assert!(card.matches_lowercase("mind can"));
        assert!(!card.matches_lowercase("worthy"));
    }
}
