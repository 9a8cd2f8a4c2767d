use alloc::vec::Vec;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Card, CardCount, Difficulty, MatchEngine, Phase};

/// Read-only view of everything the presentation layer needs for one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub phase: Phase,
    pub difficulty: Difficulty,
    pub score: u32,
    pub moves: u32,
    pub matched_pairs: CardCount,
    pub total_pairs: CardCount,
    pub level: u32,
    pub elapsed_ms: i64,
    pub cards: Vec<Card>,
}

impl GameSnapshot {
    pub fn playable(&self) -> bool {
        self.phase.is_playing()
    }

    /// Elapsed whole seconds, for the counter display.
    pub fn elapsed_secs(&self) -> u32 {
        (self.elapsed_ms / 1000).max(0) as u32
    }
}

impl MatchEngine {
    pub fn snapshot(&self, now: DateTime<Utc>) -> GameSnapshot {
        GameSnapshot {
            phase: self.phase(),
            difficulty: self.difficulty(),
            score: self.score(),
            moves: self.moves(),
            matched_pairs: self.matched_pairs(),
            total_pairs: self.total_pairs(),
            level: self.level(),
            elapsed_ms: self.elapsed(now).num_milliseconds(),
            cards: self.cards().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SelectOutcome;

    fn t(ms: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_millis(ms).unwrap()
    }

    #[test]
    fn snapshot_reflects_the_live_session() {
        let mut engine = MatchEngine::new(7);
        engine.start_game(Difficulty::Easy, t(0)).unwrap();
        let first = engine.cards()[0].id;
        assert_eq!(engine.select_card(first, t(250)), SelectOutcome::Revealed);

        let snapshot = engine.snapshot(t(2500));

        assert!(snapshot.playable());
        assert_eq!(snapshot.total_pairs, 3);
        assert_eq!(snapshot.elapsed_ms, 2500);
        assert_eq!(snapshot.elapsed_secs(), 2);
        assert_eq!(
            snapshot
                .cards
                .iter()
                .filter(|card| card.revealed)
                .count(),
            1
        );
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let mut engine = MatchEngine::new(7);
        engine.start_game(Difficulty::Medium, t(0)).unwrap();

        let snapshot = engine.snapshot(t(1000));
        let json = serde_json::to_string(&snapshot).unwrap();
        let restored: GameSnapshot = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, snapshot);
    }
}
