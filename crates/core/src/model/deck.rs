use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::DeckId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeckError {
    #[error("deck name cannot be empty")]
    EmptyName,
}

//
// ─── DECK ──────────────────────────────────────────────────────────────────────
//

/// A named collection of flashcards.
///
/// The name is always stored trimmed and is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    id: DeckId,
    name: String,
    created_at: DateTime<Utc>,
}

impl Deck {
    /// Creates a new Deck.
    ///
    /// # Errors
    ///
    /// Returns `DeckError::EmptyName` if name is empty or whitespace-only.
    pub fn new(
        id: DeckId,
        name: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DeckError> {
        let name = validate_name(name.into())?;
        Ok(Self {
            id,
            name,
            created_at,
        })
    }

    /// Replaces the deck name, keeping identity and creation time.
    ///
    /// # Errors
    ///
    /// Returns `DeckError::EmptyName` if the new name trims to nothing; the
    /// deck is left unchanged.
    pub fn rename(&mut self, name: impl Into<String>) -> Result<(), DeckError> {
        self.name = validate_name(name.into())?;
        Ok(())
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> &DeckId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

fn validate_name(name: String) -> Result<String, DeckError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DeckError::EmptyName);
    }
    if trimmed.len() == name.len() {
        return Ok(name);
    }
    Ok(trimmed.to_owned())
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
