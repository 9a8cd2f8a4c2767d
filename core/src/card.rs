use serde::{Deserialize, Serialize};

use crate::{CardId, CellRect, Coord, Symbol};

/// A single cell of the board: symbol identity, spatial bounds, and the
/// flip/match flags mutated by the engine.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub symbol: Symbol,
    pub row: Coord,
    pub col: Coord,
    pub rect: CellRect,
    pub revealed: bool,
    pub matched: bool,
}

impl Card {
    pub const fn is_selectable(&self) -> bool {
        !self.revealed && !self.matched
    }

    /// The symbol to draw, or `None` while the card is face-down.
    pub const fn face(&self) -> Option<Symbol> {
        if self.revealed || self.matched {
            Some(self.symbol)
        } else {
            None
        }
    }
}
