use alloc::boxed::Box;
use alloc::vec::Vec;
use arrayvec::ArrayVec;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::*;

/// Think-delay between the second flip and resolution, in game-clock
/// milliseconds, so the player sees both faces before they are compared.
pub const THINK_DELAY_MS: i64 = 800;
/// Extra delay between the final match and the completed screen, so the match
/// animation registers.
pub const COMPLETION_DELAY_MS: i64 = 600;

/// Top-level state of the match engine.
///
/// Valid transitions:
/// - Menu -> Playing
/// - Playing <-> Paused
/// - Playing -> Completed
/// - Playing | Paused -> Menu
/// - Completed -> Playing
/// - Completed -> Menu
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Phase {
    /// Initial state, no live board
    Menu,
    /// Board dealt, clock running
    Playing,
    /// Clock frozen, input ignored
    Paused,
    /// All pairs matched, final score settled
    Completed,
}

impl Phase {
    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    pub const fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }

    /// A board is live (clock may be running or frozen)
    pub const fn in_game(self) -> bool {
        matches!(self, Self::Playing | Self::Paused)
    }
}

impl Default for Phase {
    fn default() -> Self {
        Self::Menu
    }
}

/// Pause-aware stopwatch. Whole time units accumulate only while running.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayClock {
    banked_ms: i64,
    resumed_at: Option<DateTime<Utc>>,
}

impl PlayClock {
    fn started(now: DateTime<Utc>) -> Self {
        Self {
            banked_ms: 0,
            resumed_at: Some(now),
        }
    }

    pub fn elapsed(&self, now: DateTime<Utc>) -> TimeDelta {
        let running = self
            .resumed_at
            .map_or(0, |at| (now - at).num_milliseconds().max(0));
        TimeDelta::milliseconds(self.banked_ms + running)
    }

    fn pause(&mut self, now: DateTime<Utc>) {
        if let Some(at) = self.resumed_at.take() {
            self.banked_ms += (now - at).num_milliseconds().max(0);
        }
    }

    fn resume(&mut self, now: DateTime<Utc>) {
        if self.resumed_at.is_none() {
            self.resumed_at = Some(now);
        }
    }

    fn stop(&mut self, now: DateTime<Utc>) {
        self.pause(now);
    }
}

/// The engine's single scheduled activity, due on the game clock rather than
/// the wall clock so a pause also suspends the countdown.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
enum PendingStep {
    /// Compare the two buffered cards
    Resolve { due_ms: i64 },
    /// Settle the final score and show the completed screen
    Complete { due_ms: i64 },
}

impl PendingStep {
    const fn due_ms(self) -> i64 {
        match self {
            Self::Resolve { due_ms } => due_ms,
            Self::Complete { due_ms } => due_ms,
        }
    }
}

/// Serializable whole-game state: everything needed to save a session and
/// resume it later. Collaborators are injected separately by [`MatchEngine`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    difficulty: Difficulty,
    board: Vec<Card>,
    flip_buffer: ArrayVec<CardId, 2>,
    score: u32,
    moves: u32,
    matched_pairs: CardCount,
    level: u32,
    phase: Phase,
    clock: PlayClock,
    pending: Option<PendingStep>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            board: Vec::new(),
            flip_buffer: ArrayVec::new(),
            score: 0,
            moves: 0,
            matched_pairs: 0,
            level: 1,
            phase: Phase::default(),
            clock: PlayClock::default(),
            pending: None,
        }
    }
}

/// The game-state machine: owns the board, the flip selection buffer, and the
/// move/score/time counters, and drives all phase transitions.
///
/// The engine schedules nothing itself. Hosts deliver timestamps: every
/// time-sensitive call takes an explicit `now`, and a periodic [`tick`]
/// (100ms or so) fires the pending resolution once its delay has elapsed.
/// Out-of-precondition calls are silent no-ops so rapid or duplicate input
/// from the presentation layer cannot corrupt a game.
///
/// [`tick`]: MatchEngine::tick
pub struct MatchEngine {
    session: SessionState,
    generator: Box<dyn BoardGenerator>,
    collaborators: Collaborators,
    symbol_pool: Vec<Symbol>,
    metrics: BoardMetrics,
}

impl MatchEngine {
    /// Engine with silent collaborators and a seeded random generator.
    pub fn new(seed: u64) -> Self {
        Self::with_collaborators(
            Box::new(RandomBoardGenerator::new(seed)),
            Collaborators::default(),
        )
    }

    pub fn with_collaborators(
        generator: Box<dyn BoardGenerator>,
        collaborators: Collaborators,
    ) -> Self {
        Self::resume(SessionState::default(), generator, collaborators)
    }

    /// Rebuild an engine around a previously saved session.
    pub fn resume(
        session: SessionState,
        generator: Box<dyn BoardGenerator>,
        collaborators: Collaborators,
    ) -> Self {
        Self {
            session,
            generator,
            collaborators,
            symbol_pool: DEFAULT_SYMBOL_POOL.to_vec(),
            metrics: BoardMetrics::default(),
        }
    }

    /// Replace the symbol pool used by subsequent games.
    pub fn set_symbol_pool(&mut self, pool: Vec<Symbol>) {
        self.symbol_pool = pool;
    }

    /// Replace the layout surface used by subsequent games.
    pub fn set_board_metrics(&mut self, metrics: BoardMetrics) {
        self.metrics = metrics;
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn phase(&self) -> Phase {
        self.session.phase
    }

    pub fn difficulty(&self) -> Difficulty {
        self.session.difficulty
    }

    pub fn score(&self) -> u32 {
        self.session.score
    }

    pub fn moves(&self) -> u32 {
        self.session.moves
    }

    pub fn matched_pairs(&self) -> CardCount {
        self.session.matched_pairs
    }

    pub fn total_pairs(&self) -> CardCount {
        (self.session.board.len() / 2) as CardCount
    }

    pub fn level(&self) -> u32 {
        self.session.level
    }

    pub fn elapsed(&self, now: DateTime<Utc>) -> TimeDelta {
        self.session.clock.elapsed(now)
    }

    pub fn cards(&self) -> &[Card] {
        &self.session.board
    }

    pub fn card(&self, card_id: CardId) -> Option<&Card> {
        self.session.board.get(card_id as usize)
    }

    /// Maps a pixel position on the layout surface to the card occupying it.
    pub fn card_at(&self, px: f32, py: f32) -> Option<CardId> {
        self.session
            .board
            .iter()
            .find(|card| card.rect.contains(px, py))
            .map(|card| card.id)
    }

    /// Whether two buffered cards are waiting out the think-delay.
    pub fn resolution_pending(&self) -> bool {
        matches!(self.session.pending, Some(PendingStep::Resolve { .. }))
    }

    pub fn can_select(&self, card_id: CardId) -> bool {
        self.session.phase.is_playing()
            && !self.session.flip_buffer.is_full()
            && self
                .card(card_id)
                .map_or(false, |card| card.is_selectable())
    }

    /// Persisted best score for the current difficulty, `None` when nothing
    /// is stored yet or the store is unavailable.
    pub fn best_score(&self) -> Option<u32> {
        match self
            .collaborators
            .best_scores
            .best_score(self.session.difficulty.name())
        {
            Ok(best) => best,
            Err(err) => {
                log::warn!("best-score read failed: {}", err);
                None
            }
        }
    }

    /// Deals a fresh board and starts the clock. Valid from `Menu` or
    /// `Completed`; a no-op from any other phase. On a generation failure the
    /// engine returns to `Menu` and propagates the error.
    pub fn start_game(&mut self, difficulty: Difficulty, now: DateTime<Utc>) -> Result<()> {
        if self.session.phase.in_game() {
            return Ok(());
        }

        let started = self.begin(difficulty, now);
        if started.is_err() {
            self.return_to_menu();
        }
        started
    }

    /// From `Completed` only: bumps the level and restarts with the same
    /// difficulty profile. The grid shape intentionally stays the same from
    /// level to level.
    pub fn play_again(&mut self, now: DateTime<Utc>) -> Result<()> {
        if !self.session.phase.is_completed() {
            return Ok(());
        }

        let next_level = self.session.level.saturating_add(1);
        match self.begin(self.session.difficulty, now) {
            Ok(()) => {
                self.session.level = next_level;
                Ok(())
            }
            Err(err) => {
                self.return_to_menu();
                Err(err)
            }
        }
    }

    /// Valid from any state: discards the live board, cancels the pending
    /// step, and resets the level to 1.
    pub fn return_to_menu(&mut self) {
        let difficulty = self.session.difficulty;
        self.session = SessionState {
            difficulty,
            ..SessionState::default()
        };
        log::debug!("returned to menu");
    }

    /// Reveals a face-down card. A no-op outside `Playing`, while two cards
    /// await resolution, or when the card is already revealed or matched.
    /// The second reveal of a pair counts a move and schedules resolution
    /// after [`THINK_DELAY_MS`] of game time.
    pub fn select_card(&mut self, card_id: CardId, now: DateTime<Utc>) -> SelectOutcome {
        use SelectOutcome::*;

        if !self.session.phase.is_playing() || self.session.flip_buffer.is_full() {
            return NoChange;
        }

        let Some(card) = self.session.board.get_mut(card_id as usize) else {
            return NoChange;
        };
        if !card.is_selectable() {
            return NoChange;
        }

        card.revealed = true;
        let symbol = card.symbol;
        self.session.flip_buffer.push(card_id);
        self.collaborators.audio.on_flip();
        log::debug!("card {} revealed ({:?})", card_id, symbol);

        if self.session.flip_buffer.is_full() {
            self.session.moves = self.session.moves.saturating_add(1);
            let due_ms = self.session.clock.elapsed(now).num_milliseconds() + THINK_DELAY_MS;
            self.session.pending = Some(PendingStep::Resolve { due_ms });
            PairPending
        } else {
            Revealed
        }
    }

    /// Host-driven periodic tick. Checks the phase first so it is safe to
    /// keep an interval running across pauses; fires the pending step once
    /// the game clock reaches its deadline.
    pub fn tick(&mut self, now: DateTime<Utc>) -> TickOutcome {
        if !self.session.phase.is_playing() {
            return TickOutcome::NoChange;
        }

        let Some(step) = self.session.pending else {
            return TickOutcome::NoChange;
        };
        if self.session.clock.elapsed(now).num_milliseconds() < step.due_ms() {
            return TickOutcome::NoChange;
        }

        match step {
            PendingStep::Resolve { .. } => self.resolve(now),
            PendingStep::Complete { .. } => self.complete(now),
        }
    }

    /// Freezes or resumes the clock. A no-op outside `Playing`/`Paused`.
    /// Returns whether the phase changed.
    pub fn toggle_pause(&mut self, now: DateTime<Utc>) -> bool {
        match self.session.phase {
            Phase::Playing => {
                self.session.clock.pause(now);
                self.session.phase = Phase::Paused;
                log::debug!("paused");
                true
            }
            Phase::Paused => {
                self.session.clock.resume(now);
                self.session.phase = Phase::Playing;
                log::debug!("resumed");
                true
            }
            Phase::Menu | Phase::Completed => false,
        }
    }

    fn begin(&mut self, difficulty: Difficulty, now: DateTime<Utc>) -> Result<()> {
        let profile = difficulty.profile();
        let board = self
            .generator
            .generate(&profile, &self.symbol_pool, self.metrics)?;

        let session = &mut self.session;
        session.difficulty = difficulty;
        session.board = board;
        session.flip_buffer.clear();
        session.score = 0;
        session.moves = 0;
        session.matched_pairs = 0;
        session.pending = None;
        session.clock = PlayClock::started(now);
        session.phase = Phase::Playing;
        log::debug!("game started: {} level {}", profile.name, session.level);
        Ok(())
    }

    /// Compares the two buffered cards once the think-delay expires. Either
    /// path empties the flip buffer before new input is accepted.
    fn resolve(&mut self, now: DateTime<Utc>) -> TickOutcome {
        self.session.pending = None;

        let drained = core::mem::take(&mut self.session.flip_buffer);
        let [first_id, second_id] = match drained.into_inner() {
            Ok(pair) => pair,
            Err(_) => return TickOutcome::NoChange,
        };

        let first = self.session.board[first_id as usize];
        let second = self.session.board[second_id as usize];

        if first.symbol != second.symbol {
            self.session.board[first_id as usize].revealed = false;
            self.session.board[second_id as usize].revealed = false;
            log::debug!("mismatch: {:?} vs {:?}", first.symbol, second.symbol);
            return TickOutcome::Mismatch;
        }

        self.session.board[first_id as usize].matched = true;
        self.session.board[second_id as usize].matched = true;
        self.session.matched_pairs += 1;

        let award = match_award(
            self.session.clock.elapsed(now),
            self.session.moves,
            &self.session.difficulty.profile(),
        );
        self.session.score = self.session.score.saturating_add(award);
        self.collaborators.audio.on_match();
        self.collaborators
            .particles
            .on_match_particles(first.rect, second.rect);
        log::debug!("match: {:?}, +{} points", first.symbol, award);

        if self.session.matched_pairs == self.total_pairs() {
            let due_ms = self.session.clock.elapsed(now).num_milliseconds() + COMPLETION_DELAY_MS;
            self.session.pending = Some(PendingStep::Complete { due_ms });
        }
        TickOutcome::Matched
    }

    /// Final transition: stop the clock, add the completion bonus, persist
    /// the best score, and move to `Completed`.
    fn complete(&mut self, now: DateTime<Utc>) -> TickOutcome {
        self.session.pending = None;
        self.session.clock.stop(now);

        let elapsed = self.session.clock.elapsed(now);
        self.session.score = self.session.score.saturating_add(completion_bonus(elapsed));
        self.session.phase = Phase::Completed;
        self.collaborators.audio.on_victory();
        self.record_best_score();
        log::debug!(
            "completed: {} points in {}s",
            self.session.score,
            elapsed.num_seconds()
        );
        TickOutcome::Completed
    }

    fn record_best_score(&mut self) {
        let name = self.session.difficulty.name();
        let score = self.session.score;

        let improved = match self.collaborators.best_scores.best_score(name) {
            Ok(best) => best.map_or(true, |best| score > best),
            Err(err) => {
                log::warn!("best-score read failed, recording anyway: {}", err);
                true
            }
        };
        if improved {
            if let Err(err) = self.collaborators.best_scores.record_best_score(name, score) {
                log::warn!("best-score write failed: {}", err);
            }
        }
    }
}
