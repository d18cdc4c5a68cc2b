use serde::{Deserialize, Serialize};

use crate::*;

/// Visible side of a card.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardFace {
    FaceDown,
    FaceUp,
    /// Terminal, a matched card is never flipped again.
    Matched,
}

impl CardFace {
    pub const fn is_face_down(self) -> bool {
        matches!(self, Self::FaceDown)
    }

    pub const fn is_face_up(self) -> bool {
        matches!(self, Self::FaceUp)
    }

    pub const fn is_matched(self) -> bool {
        matches!(self, Self::Matched)
    }

    pub(crate) const fn name(self) -> &'static str {
        match self {
            Self::FaceDown => "FaceDown",
            Self::FaceUp => "FaceUp",
            Self::Matched => "Matched",
        }
    }
}

impl Default for CardFace {
    fn default() -> Self {
        Self::FaceDown
    }
}

/// One board position, also the persisted form of a card.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CardSlot {
    pub value: CardValue,
    pub face: CardFace,
    pub row: Coord,
    pub column: Coord,
}

impl CardSlot {
    pub const fn new(value: CardValue, (row, column): Coord2) -> Self {
        Self {
            value,
            face: CardFace::FaceDown,
            row,
            column,
        }
    }

    pub const fn coords(&self) -> Coord2 {
        (self.row, self.column)
    }

    /// Whether the player may still pick this card.
    pub const fn is_selectable(&self) -> bool {
        self.face.is_face_down()
    }

    /// Face-up cards still waiting on a comparison.
    pub const fn is_pending(&self) -> bool {
        self.face.is_face_up()
    }
}
