use serde::{Deserialize, Serialize};

/// Position of a card in its deck; stable for the life of a session.
pub type CardId = usize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub symbol: String,
    pub is_flipped: bool,
    pub is_matched: bool,
}

impl Card {
    pub fn new(id: CardId, symbol: impl Into<String>) -> Self {
        Self {
            id,
            symbol: symbol.into(),
            is_flipped: false,
            is_matched: false,
        }
    }

    /// Whether the symbol is visible to the player.
    pub fn is_face_up(&self) -> bool {
        self.is_flipped || self.is_matched
    }

    pub fn can_flip(&self) -> bool {
        !self.is_flipped && !self.is_matched
    }

    pub fn pairs_with(&self, other: &Card) -> bool {
        self.id != other.id && self.symbol == other.symbol
    }
}
