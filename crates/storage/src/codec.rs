//! Snapshot schema and the validating decoder.
//!
//! The layout matches the single-record JSON the study app has always
//! written: camelCase keys and epoch-millisecond timestamps.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use lotus_core::model::{Card, CardId, Deck, DeckId, Document};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::repository::StorageError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedDeck {
    pub id: String,
    pub name: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl PersistedDeck {
    #[must_use]
    pub fn from_deck(deck: &Deck) -> Self {
        Self {
            id: deck.id().to_string(),
            name: deck.name().to_owned(),
            created_at: deck.created_at(),
        }
    }

    /// Convert the record back into a domain `Deck`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` for a blank id or name.
    pub fn into_deck(self) -> Result<Deck, StorageError> {
        let id: DeckId = self.id.parse().map_err(ser)?;
        Deck::new(id, self.name, self.created_at).map_err(ser)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedCard {
    pub id: String,
    pub front: String,
    pub back: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

impl PersistedCard {
    #[must_use]
    pub fn from_card(card: &Card) -> Self {
        Self {
            id: card.id().to_string(),
            front: card.front().to_owned(),
            back: card.back().to_owned(),
            updated_at: card.updated_at(),
        }
    }

    /// Convert the record back into a domain `Card`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` for a blank id or side.
    pub fn into_card(self) -> Result<Card, StorageError> {
        let id: CardId = self.id.parse().map_err(ser)?;
        Card::new(id, self.front, self.back, self.updated_at).map_err(ser)
    }
}

/// Persisted shape of the whole document. Session state has no place here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedDocument {
    pub decks: Vec<PersistedDeck>,
    pub cards_by_deck_id: BTreeMap<String, Vec<PersistedCard>>,
    pub active_deck_id: Option<String>,
}

impl PersistedDocument {
    #[must_use]
    pub fn from_document(document: &Document) -> Self {
        Self {
            decks: document.decks().iter().map(PersistedDeck::from_deck).collect(),
            cards_by_deck_id: document
                .cards_by_deck_id()
                .iter()
                .map(|(id, cards)| {
                    (
                        id.to_string(),
                        cards.iter().map(PersistedCard::from_card).collect(),
                    )
                })
                .collect(),
            active_deck_id: document.active_deck_id().map(ToString::to_string),
        }
    }
}

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

/// Serialize a document to its snapshot text.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if JSON encoding fails.
pub fn encode_document(document: &Document) -> Result<String, StorageError> {
    serde_json::to_string(&PersistedDocument::from_document(document)).map_err(ser)
}

/// Decode snapshot text, salvaging whatever is well-formed.
///
/// Returns `None` when the text is not a JSON object at all. Inside an
/// object, a non-array `decks` or non-object `cardsByDeckId` is treated as
/// empty and individual malformed entries are dropped.
#[must_use]
pub fn decode_document(raw: &str) -> Option<Document> {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(error = %err, "snapshot is not valid JSON");
            return None;
        }
    };
    let Value::Object(mut root) = value else {
        tracing::warn!("snapshot top level is not an object");
        return None;
    };

    let decks = match root.remove("decks") {
        Some(Value::Array(items)) => items.into_iter().filter_map(decode_deck).collect(),
        _ => Vec::new(),
    };

    let mut cards_by_deck_id = BTreeMap::new();
    if let Some(Value::Object(lists)) = root.remove("cardsByDeckId") {
        for (raw_id, list) in lists {
            let Ok(deck_id) = raw_id.parse::<DeckId>() else {
                continue;
            };
            let Value::Array(items) = list else {
                tracing::warn!(deck_id = %deck_id, "card list is not an array");
                continue;
            };
            let cards: Vec<Card> = items.into_iter().filter_map(decode_card).collect();
            cards_by_deck_id.insert(deck_id, cards);
        }
    }

    let active_deck_id = match root.remove("activeDeckId") {
        Some(Value::String(id)) => id.parse::<DeckId>().ok(),
        _ => None,
    };

    Some(Document::from_parts(decks, cards_by_deck_id, active_deck_id))
}

fn decode_deck(value: Value) -> Option<Deck> {
    let decoded = serde_json::from_value::<PersistedDeck>(value)
        .map_err(ser)
        .and_then(PersistedDeck::into_deck);
    match decoded {
        Ok(deck) => Some(deck),
        Err(err) => {
            tracing::warn!(error = %err, "dropping malformed deck entry");
            None
        }
    }
}

fn decode_card(value: Value) -> Option<Card> {
    let decoded = serde_json::from_value::<PersistedCard>(value)
        .map_err(ser)
        .and_then(PersistedCard::into_card);
    match decoded {
        Ok(card) => Some(card),
        Err(err) => {
            tracing::warn!(error = %err, "dropping malformed card entry");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lotus_core::time::fixed_now;

    fn sample_document() -> Document {
        let mut doc = Document::new();
        let deck = Deck::new(DeckId::generate(), "Spanish", fixed_now()).unwrap();
        doc.add_deck(deck).unwrap();
        let card = Card::new(CardId::generate(), "hola", "hello", fixed_now()).unwrap();
        doc.add_card_to_active(card).unwrap();
        doc
    }

    #[test]
    fn encodes_with_camel_case_and_millis() {
        let doc = sample_document();
        let raw = encode_document(&doc).unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();

        assert!(value["cardsByDeckId"].is_object());
        assert_eq!(value["decks"][0]["createdAt"], 1_700_000_000_000_i64);
        assert_eq!(
            value["activeDeckId"].as_str(),
            doc.active_deck_id().map(DeckId::as_str)
        );
    }

    #[test]
    fn round_trip_is_lossless() {
        let doc = sample_document();
        let raw = encode_document(&doc).unwrap();
        assert_eq!(decode_document(&raw), Some(doc));
    }

    #[test]
    fn garbage_and_null_decode_to_none() {
        assert_eq!(decode_document("{not json"), None);
        assert_eq!(decode_document("null"), None);
        assert_eq!(decode_document("[1,2,3]"), None);
        assert_eq!(decode_document(""), None);
    }

    #[test]
    fn wrong_shapes_are_substituted_with_empty() {
        let doc = decode_document(r#"{"decks": 5, "cardsByDeckId": [], "activeDeckId": 7}"#)
            .unwrap();
        assert!(!doc.has_decks());
        assert!(doc.cards_by_deck_id().is_empty());
        assert_eq!(doc.active_deck_id(), None);
    }

    #[test]
    fn missing_active_deck_defaults_to_absent() {
        let raw = r#"{
            "decks": [{"id": "d1", "name": "One", "createdAt": 1700000000000}],
            "cardsByDeckId": {"d1": []}
        }"#;
        let doc = decode_document(raw).unwrap();
        assert_eq!(doc.decks().len(), 1);
        assert_eq!(doc.active_deck_id(), None);
    }

    #[test]
    fn malformed_entries_are_dropped() {
        let raw = r#"{
            "decks": [
                {"id": "d1", "name": "Good", "createdAt": 1700000000000},
                {"id": "d2", "name": "   ", "createdAt": 1700000000000},
                {"name": "No id", "createdAt": 1700000000000},
                "not a deck"
            ],
            "cardsByDeckId": {
                "d1": [
                    {"id": "c1", "front": "f", "back": "b", "updatedAt": 1700000000000},
                    {"id": "c2", "front": "", "back": "b", "updatedAt": 1700000000000},
                    {"id": "c3", "front": "f", "back": "b"}
                ],
                "ghost": [
                    {"id": "c4", "front": "f", "back": "b", "updatedAt": 1700000000000}
                ]
            },
            "activeDeckId": "d1"
        }"#;
        let doc = decode_document(raw).unwrap();

        assert_eq!(doc.decks().len(), 1);
        assert_eq!(doc.decks()[0].name(), "Good");
        assert_eq!(doc.active_cards().len(), 1);
        assert_eq!(doc.active_cards()[0].id().as_str(), "c1");
        assert_eq!(doc.cards_by_deck_id().len(), 1);
    }

    #[test]
    fn blank_ids_never_reach_the_document() {
        let raw = r#"{
            "decks": [
                {"id": "  ", "name": "Blank", "createdAt": 1700000000000},
                {"id": "d1", "name": "Kept", "createdAt": 1700000000000}
            ],
            "cardsByDeckId": {
                "d1": [{"id": "", "front": "f", "back": "b", "updatedAt": 1700000000000}]
            },
            "activeDeckId": "d1"
        }"#;
        let doc = decode_document(raw).unwrap();

        assert_eq!(doc.decks().len(), 1);
        assert_eq!(doc.decks()[0].id().as_str(), "d1");
        assert!(doc.active_cards().is_empty());
    }

    #[test]
    fn dangling_active_deck_falls_back_to_first() {
        let raw = r#"{
            "decks": [{"id": "d1", "name": "One", "createdAt": 1700000000000}],
            "cardsByDeckId": {},
            "activeDeckId": "gone"
        }"#;
        let doc = decode_document(raw).unwrap();
        assert_eq!(doc.active_deck_id().map(DeckId::as_str), Some("d1"));
        assert!(doc.active_cards().is_empty());
    }

    #[test]
    fn legacy_fallback_ids_are_accepted() {
        let raw = r#"{
            "decks": [{"id": "17000000000004f1a2b3c", "name": "Old", "createdAt": 1700000000000}],
            "cardsByDeckId": {"17000000000004f1a2b3c": []},
            "activeDeckId": "17000000000004f1a2b3c"
        }"#;
        let doc = decode_document(raw).unwrap();
        assert_eq!(doc.active_deck().map(Deck::name), Some("Old"));
    }
}
