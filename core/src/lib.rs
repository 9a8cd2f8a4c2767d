#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use card::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use score::*;
pub use sinks::*;
pub use snapshot::*;
pub use types::*;

mod card;
mod engine;
mod error;
mod generator;
mod score;
mod sinks;
mod snapshot;
mod types;

/// Symbols dealt to boards in pool order; larger grids reveal more of the pool.
pub const DEFAULT_SYMBOL_POOL: &[Symbol] = &[
    '🎈', '🎲', '🎧', '🐙', '🦊', '🍩', '⚽', '🌙', '🔑', '🚀', '🌵', '🍉', '🐸', '🍒', '🎁',
    '⭐', '🛸', '🧃',
];

/// Named difficulty tiers exposed to the settings UI.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub const ALL: [Self; 4] = [Self::Easy, Self::Medium, Self::Hard, Self::Expert];

    pub const fn name(self) -> &'static str {
        use Difficulty::*;
        match self {
            Easy => "easy",
            Medium => "medium",
            Hard => "hard",
            Expert => "expert",
        }
    }

    pub const fn profile(self) -> DifficultyProfile {
        use Difficulty::*;
        match self {
            Easy => DifficultyProfile::new_unchecked("easy", 2, 3, 30),
            Medium => DifficultyProfile::new_unchecked("medium", 3, 4, 60),
            Hard => DifficultyProfile::new_unchecked("hard", 4, 4, 90),
            Expert => DifficultyProfile::new_unchecked("expert", 4, 6, 120),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|difficulty| difficulty.name() == name)
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Easy
    }
}

/// Grid shape and scoring configuration for one game.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct DifficultyProfile {
    pub name: &'static str,
    pub rows: Coord,
    pub cols: Coord,
    /// Seconds of time bonus available to the match award before it decays.
    pub time_bonus_base: u32,
}

impl DifficultyProfile {
    pub const fn new_unchecked(
        name: &'static str,
        rows: Coord,
        cols: Coord,
        time_bonus_base: u32,
    ) -> Self {
        Self {
            name,
            rows,
            cols,
            time_bonus_base,
        }
    }

    /// Every card needs exactly one partner, so the grid must hold an even
    /// number of cards, at least four.
    pub fn new(
        name: &'static str,
        rows: Coord,
        cols: Coord,
        time_bonus_base: u32,
    ) -> Result<Self> {
        let cards = mult(rows, cols);
        if cards < 4 || cards % 2 != 0 {
            return Err(GameError::InvalidGridShape);
        }
        Ok(Self::new_unchecked(name, rows, cols, time_bonus_base))
    }

    pub const fn total_cards(&self) -> CardCount {
        mult(self.rows, self.cols)
    }

    pub const fn pair_count(&self) -> CardCount {
        self.total_cards() / 2
    }
}

/// Outcome of a card selection.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SelectOutcome {
    NoChange,
    Revealed,
    /// Second card buffered; resolution is now pending.
    PairPending,
}

impl SelectOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        use SelectOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            PairPending => true,
        }
    }
}

/// Outcome of one host tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TickOutcome {
    NoChange,
    /// Two mismatched cards went back face-down.
    Mismatch,
    /// A pair was matched and scored.
    Matched,
    /// The final pair registered and the game completed.
    Completed,
}

impl TickOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        use TickOutcome::*;
        match self {
            NoChange => false,
            Mismatch => true,
            Matched => true,
            Completed => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tiers_have_valid_grid_shapes() {
        for difficulty in Difficulty::ALL {
            let profile = difficulty.profile();
            let cards = profile.total_cards();
            assert!(cards >= 4 && cards % 2 == 0, "{}", profile.name);
        }
    }

    #[test]
    fn default_pool_covers_the_largest_tier() {
        let largest = Difficulty::Expert.profile().pair_count() as usize;
        assert!(DEFAULT_SYMBOL_POOL.len() >= largest);
    }

    #[test]
    fn tier_names_round_trip() {
        for difficulty in Difficulty::ALL {
            assert_eq!(Difficulty::from_name(difficulty.name()), Some(difficulty));
        }
        assert_eq!(Difficulty::from_name("nightmare"), None);
    }

    #[test]
    fn odd_or_tiny_grids_are_rejected() {
        assert_eq!(
            DifficultyProfile::new("odd", 3, 3, 30),
            Err(GameError::InvalidGridShape)
        );
        assert_eq!(
            DifficultyProfile::new("tiny", 1, 2, 30),
            Err(GameError::InvalidGridShape)
        );
        assert!(DifficultyProfile::new("pair-grid", 2, 2, 30).is_ok());
    }
}
