mod card;
mod deck;
mod document;
mod ids;
pub mod session;

pub use ids::{CardId, DeckId, ParseIdError};

pub use card::{Card, CardError};
pub use deck::{Deck, DeckError};
pub use document::{Document, DocumentError};
pub use session::{SessionState, SessionView};
