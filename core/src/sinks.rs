//! Boundary contracts for the engine's collaborators. Everything here is
//! fire-and-forget or best-effort: a failing or absent collaborator never
//! blocks a state transition.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

use crate::{CellRect, StoreError};

/// Audio notifications emitted by the engine; the engine never waits on these.
pub trait AudioSink {
    fn on_flip(&mut self) {}
    fn on_match(&mut self) {}
    fn on_victory(&mut self) {}
}

/// Audio collaborator that produces no sound.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {}

/// Particle-burst notifications emitted when a pair matches.
pub trait ParticleSink {
    /// Burst request at the two matched cards' screen rectangles.
    fn on_match_particles(&mut self, first: CellRect, second: CellRect) {
        let _ = (first, second);
    }
}

/// Particle collaborator that draws nothing.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullParticles;

impl ParticleSink for NullParticles {}

/// Per-difficulty persisted best score. Stored values never decrease.
pub trait BestScoreStore {
    fn best_score(&self, difficulty: &str) -> core::result::Result<Option<u32>, StoreError>;

    fn record_best_score(
        &mut self,
        difficulty: &str,
        score: u32,
    ) -> core::result::Result<(), StoreError>;
}

/// Volatile store used by tests and headless hosts.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryScoreStore {
    scores: BTreeMap<String, u32>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BestScoreStore for MemoryScoreStore {
    fn best_score(&self, difficulty: &str) -> core::result::Result<Option<u32>, StoreError> {
        Ok(self.scores.get(difficulty).copied())
    }

    fn record_best_score(
        &mut self,
        difficulty: &str,
        score: u32,
    ) -> core::result::Result<(), StoreError> {
        let best = self.scores.entry(difficulty.to_string()).or_insert(score);
        *best = (*best).max(score);
        Ok(())
    }
}

/// Collaborator bundle injected into the engine at construction. The default
/// bundle is silent and stores best scores in memory.
pub struct Collaborators {
    pub audio: Box<dyn AudioSink>,
    pub particles: Box<dyn ParticleSink>,
    pub best_scores: Box<dyn BestScoreStore>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            audio: Box::new(NullAudio),
            particles: Box::new(NullParticles),
            best_scores: Box::new(MemoryScoreStore::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_score_round_trips() {
        let mut store = MemoryScoreStore::new();

        assert_eq!(store.best_score("easy"), Ok(None));
        store.record_best_score("easy", 420).unwrap();
        assert_eq!(store.best_score("easy"), Ok(Some(420)));
        assert_eq!(store.best_score("hard"), Ok(None));
    }

    #[test]
    fn lower_scores_never_replace_the_best() {
        let mut store = MemoryScoreStore::new();

        store.record_best_score("medium", 900).unwrap();
        store.record_best_score("medium", 250).unwrap();
        assert_eq!(store.best_score("medium"), Ok(Some(900)));

        store.record_best_score("medium", 1200).unwrap();
        assert_eq!(store.best_score("medium"), Ok(Some(1200)));
    }
}
