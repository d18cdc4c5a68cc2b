use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::time::Duration;
use serde::{Deserialize, Serialize};

use crate::*;

/// Counters mutated by the engine, persisted with every snapshot.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub score: u32,
    /// Pairs of flips, a move is counted on every second reveal.
    pub moves: u32,
    pub matched_pairs: CellCount,
    pub total_pairs: CellCount,
    pub combo_count: u32,
    /// `moves` at the last match, `None` before the first one.
    pub last_match_move: Option<u32>,
}

impl SessionStats {
    pub const fn new(total_pairs: CellCount) -> Self {
        Self {
            score: 0,
            moves: 0,
            matched_pairs: 0,
            total_pairs,
            combo_count: 0,
            last_match_move: None,
        }
    }

    pub const fn is_complete(&self) -> bool {
        self.matched_pairs >= self.total_pairs
    }
}

/// Where the current turn stands.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TurnState {
    Idle,
    OneSelected,
    /// A comparison is scheduled and waiting on its delay.
    Resolving,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Gated input or a card that is already showing.
    Ignored,
    Revealed,
    ComparisonScheduled,
}

impl SelectOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::Ignored => false,
            Self::Revealed => true,
            Self::ComparisonScheduled => true,
        }
    }
}

/// Notifications produced while the engine runs, in the order they happened.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    CardRevealed(Coord2),
    CardConcealed(Coord2),
    CardMatched(Coord2),
    MovesChanged(u32),
    ScoreChanged { score: u32, combo: u32 },
    PairResolved {
        first: Coord2,
        second: Coord2,
        matched: bool,
        points: u32,
    },
    Cue(AudioCue),
    Won,
    SaveRequested,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum EngineTask {
    ComparePair,
}

/// Drives reveals, pair comparisons, and scoring for one board.
///
/// The engine owns its timers, so dropping it also drops any comparison still waiting.
#[derive(Clone, Debug)]
pub struct MatchEngine {
    board: Board,
    stats: SessionStats,
    rules: ScoringRules,
    flip_back_delay: Duration,
    selection: VecDeque<Coord2>,
    flips: u32,
    /// A comparison is scheduled, no other one may start.
    resolving: bool,
    scheduler: Scheduler<EngineTask>,
}

impl MatchEngine {
    pub fn new(board: Board, rules: ScoringRules, flip_back_delay: Duration) -> Self {
        let stats = SessionStats::new(board.total_pairs());
        Self {
            board,
            stats,
            rules,
            flip_back_delay,
            selection: VecDeque::new(),
            flips: 0,
            resolving: false,
            scheduler: Scheduler::new(),
        }
    }

    /// Resumes a saved game, queueing every face-up card that was still waiting on a comparison.
    ///
    /// Nothing is scheduled until [`resume_pending`](Self::resume_pending) is called.
    pub fn restore(
        board: Board,
        stats: SessionStats,
        rules: ScoringRules,
        flip_back_delay: Duration,
    ) -> Result<Self> {
        if stats.total_pairs != board.total_pairs()
            || stats.matched_pairs.saturating_mul(2) != board.matched_count()
        {
            log::warn!(
                "Stats do not fit the board: {:?} on {} pairs with {} matched cards",
                stats,
                board.total_pairs(),
                board.matched_count()
            );
            return Err(GameError::CorruptData);
        }

        let selection: VecDeque<_> = board.face_up_unmatched().collect();
        // an odd queue means the last move was half done
        let flips = stats.moves.saturating_mul(2) + (selection.len() % 2) as u32;
        log::debug!(
            "Restored engine with {} pending cards, {} flips",
            selection.len(),
            flips
        );

        Ok(Self {
            board,
            stats,
            rules,
            flip_back_delay,
            selection,
            flips,
            resolving: false,
            scheduler: Scheduler::new(),
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn rules(&self) -> &ScoringRules {
        &self.rules
    }

    pub fn is_resolving(&self) -> bool {
        self.resolving
    }

    pub fn is_won(&self) -> bool {
        self.stats.is_complete()
    }

    pub fn turn_state(&self) -> TurnState {
        if self.is_resolving() {
            TurnState::Resolving
        } else if self.selection.is_empty() {
            TurnState::Idle
        } else {
            TurnState::OneSelected
        }
    }

    /// Face-up cards waiting on a comparison, oldest first.
    pub fn pending_selection(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.selection.iter().copied()
    }

    /// Time until the in-flight comparison resolves.
    pub fn next_resolution_in(&self) -> Option<Duration> {
        self.scheduler.next_due_in()
    }

    /// Reveals a card on behalf of the player.
    ///
    /// Gated input and cards that are already showing are ignored, only coordinates outside the board
    /// are an error.
    pub fn select_card(
        &mut self,
        coords: Coord2,
        accepting_input: bool,
        events: &mut Vec<GameEvent>,
    ) -> Result<SelectOutcome> {
        use SelectOutcome::*;

        let coords = self.board.validate_coords(coords)?;

        if !accepting_input || self.is_won() {
            log::trace!("Input gated, ignoring {:?}", coords);
            return Ok(Ignored);
        }
        if !self.board[coords].is_selectable() {
            log::trace!(
                "Card {:?} is {:?}, ignoring",
                coords,
                self.board[coords].face
            );
            return Ok(Ignored);
        }

        self.board.reveal(coords)?;
        events.push(GameEvent::CardRevealed(coords));
        events.push(GameEvent::Cue(AudioCue::Flip));

        self.flips += 1;
        if self.flips % 2 == 0 {
            self.stats.moves += 1;
            events.push(GameEvent::MovesChanged(self.stats.moves));
        }
        self.selection.push_back(coords);
        log::debug!(
            "Revealed {:?}, value {}, {} waiting",
            coords,
            self.board[coords].value,
            self.selection.len()
        );

        Ok(if self.schedule_comparison() {
            ComparisonScheduled
        } else {
            Revealed
        })
    }

    /// Schedules a comparison for cards queued by a restore, returns whether one was scheduled.
    pub fn resume_pending(&mut self) -> bool {
        self.schedule_comparison()
    }

    fn schedule_comparison(&mut self) -> bool {
        if self.resolving || self.selection.len() < 2 {
            return false;
        }
        self.scheduler
            .schedule(self.flip_back_delay, EngineTask::ComparePair);
        self.resolving = true;
        log::trace!("Comparison scheduled in {:?}", self.flip_back_delay);
        true
    }

    /// Moves the engine clock, resolving every comparison that comes due.
    pub fn advance(&mut self, delta: Duration, events: &mut Vec<GameEvent>) -> Result<()> {
        let deadline = self.scheduler.deadline_after(delta);
        while let Some(task) = self.scheduler.pop_due(deadline) {
            match task {
                EngineTask::ComparePair => self.resolve_pair(events)?,
            }
        }
        self.scheduler.advance_to(deadline);
        Ok(())
    }

    fn resolve_pair(&mut self, events: &mut Vec<GameEvent>) -> Result<()> {
        self.resolving = false;

        if self.selection.len() < 2 {
            log::warn!(
                "Comparison fired with {} cards queued",
                self.selection.len()
            );
            return Ok(());
        }
        let (Some(first), Some(second)) = (self.selection.pop_front(), self.selection.pop_front())
        else {
            return Ok(());
        };

        let (a, b) = (self.board[first], self.board[second]);
        let matched = a.value == b.value && a.face.is_face_up() && b.face.is_face_up();
        let points = if matched {
            self.apply_match(first, second, events)?
        } else {
            self.apply_mismatch(first, second, events)?;
            0
        };
        events.push(GameEvent::PairResolved {
            first,
            second,
            matched,
            points,
        });

        if self.is_won() {
            log::debug!(
                "All {} pairs found, final score {}",
                self.stats.total_pairs,
                self.stats.score
            );
            events.push(GameEvent::Cue(AudioCue::Win));
            events.push(GameEvent::Won);
        }
        events.push(GameEvent::SaveRequested);

        self.schedule_comparison();
        Ok(())
    }

    fn apply_match(
        &mut self,
        first: Coord2,
        second: Coord2,
        events: &mut Vec<GameEvent>,
    ) -> Result<u32> {
        self.board.mark_matched(first)?;
        self.board.mark_matched(second)?;

        let moves = self.stats.moves;
        let combo_window = self.rules.combo_window;
        let in_window = self
            .stats
            .last_match_move
            .is_some_and(|last| moves.saturating_sub(last) <= combo_window);
        if in_window {
            self.stats.combo_count += 1;
        } else {
            self.stats.combo_count = 0;
        }

        let points = self.rules.match_score(self.stats.combo_count);
        self.stats.score = self.stats.score.saturating_add(points);
        self.stats.last_match_move = Some(moves);
        self.stats.matched_pairs += 1;
        log::debug!(
            "Matched {:?} and {:?} for {} points, combo {}",
            first,
            second,
            points,
            self.stats.combo_count
        );

        events.push(GameEvent::CardMatched(first));
        events.push(GameEvent::CardMatched(second));
        events.push(GameEvent::Cue(AudioCue::Match));
        events.push(GameEvent::ScoreChanged {
            score: self.stats.score,
            combo: self.stats.combo_count,
        });
        Ok(points)
    }

    fn apply_mismatch(
        &mut self,
        first: Coord2,
        second: Coord2,
        events: &mut Vec<GameEvent>,
    ) -> Result<()> {
        self.stats.combo_count = 0;
        log::debug!("Mismatch between {:?} and {:?}", first, second);

        events.push(GameEvent::Cue(AudioCue::Mismatch));
        for coords in [first, second] {
            // may have been matched while this comparison was waiting
            if self.board[coords].face.is_face_up() {
                self.board.conceal(coords)?;
                events.push(GameEvent::CardConcealed(coords));
            }
        }
        Ok(())
    }

    /// Shows every face-down card for the memorization preview, returns the ones that were turned.
    pub fn reveal_for_preview(&mut self, events: &mut Vec<GameEvent>) -> Result<Vec<Coord2>> {
        let hidden: Vec<_> = self
            .board
            .iter()
            .filter(|card| card.face.is_face_down())
            .map(CardSlot::coords)
            .collect();
        for &coords in &hidden {
            self.board.force_reveal(coords)?;
            events.push(GameEvent::CardRevealed(coords));
        }
        Ok(hidden)
    }

    /// Turns the preview cards back down, leaving anything that changed since alone.
    pub fn conceal_after_preview(
        &mut self,
        previewed: &[Coord2],
        events: &mut Vec<GameEvent>,
    ) -> Result<()> {
        for &coords in previewed {
            if self.board[coords].face.is_face_up() && !self.selection.contains(&coords) {
                self.board.conceal(coords)?;
                events.push(GameEvent::CardConcealed(coords));
            }
        }
        Ok(())
    }
}
