use super::board::Board;
use super::bot_controller::has_valid_swap;
use super::cascade::{CascadeStep, resolve_step};
use super::detector::find_matches;
use super::selection::{Selection, SelectionOutcome};
use super::settings::Match3Settings;
use super::types::{
    Gem, GemKind, GemMove, MAX_GENERATION_ATTEMPTS, MatchEvent, MatchHandler, Position,
};
use crate::config::Validate;
use crate::games::pace::Pace;
use crate::games::session_rng::SessionRng;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    /// Swap applied and shown; commits or reverts on the next step.
    SwapShown {
        first: Position,
        second: Position,
        matched: bool,
    },
    /// Matched cells are empty; gravity runs next.
    Clearing,
    /// Gravity and refill done; the board is checked again next.
    Dropped,
    /// Settled with a non-zero combo that resets on the next step.
    ComboFading,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputOutcome {
    /// Processing, off the board, or otherwise not applicable.
    Ignored,
    Armed(Position),
    Disarmed,
    /// Not adjacent; the second cell is now the armed one.
    Reaimed(Position),
    SwapAccepted {
        first: Position,
        second: Position,
        matched: bool,
    },
}

/// What one call to [`Match3GameState::advance`] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineStep {
    SwapReverted {
        first: Position,
        second: Position,
    },
    Cleared(MatchEvent),
    Dropped {
        moves: Vec<GemMove>,
        spawned: Vec<Position>,
    },
    Settled {
        combo: u32,
        reshuffled: bool,
    },
    ComboReset,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Match3Snapshot {
    pub size: usize,
    /// Row-major.
    pub cells: Vec<Gem>,
    pub selection: Option<Position>,
    pub processing: bool,
    pub combo: u32,
}

pub struct Match3GameState {
    board: Board,
    settings: Match3Settings,
    selection: Selection,
    combo: u32,
    phase: Phase,
    swaps_made: u32,
}

impl Match3GameState {
    pub fn new(settings: Match3Settings, rng: &mut SessionRng) -> Result<Self, String> {
        settings.validate()?;
        let board = Board::generate(settings.board_size, settings.palette(), rng);
        let mut state = Self::from_board(board, settings);
        state.reshuffle_if_stuck(rng);
        Ok(state)
    }

    /// Starts idle on a prepared board, as is.
    pub fn from_board(board: Board, settings: Match3Settings) -> Self {
        Self {
            board,
            settings,
            selection: Selection::Idle,
            combo: 0,
            phase: Phase::Idle,
            swaps_made: 0,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn palette(&self) -> &'static [GemKind] {
        self.settings.palette()
    }

    pub fn selection(&self) -> Option<Position> {
        self.selection.position()
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn swaps_made(&self) -> u32 {
        self.swaps_made
    }

    /// True from an accepted swap until its cascade settles.
    pub fn is_processing(&self) -> bool {
        matches!(
            self.phase,
            Phase::SwapShown { .. } | Phase::Clearing | Phase::Dropped
        )
    }

    /// Nothing left to step through, combo included.
    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    pub fn pending_pace(&self) -> Option<Pace> {
        match self.phase {
            Phase::Idle => None,
            Phase::SwapShown { .. } => Some(Pace::SwapFeedback),
            Phase::Clearing => Some(Pace::ClearAnimation),
            Phase::Dropped => Some(Pace::DropAnimation),
            Phase::ComboFading => Some(Pace::ComboFade),
        }
    }

    pub fn select_cell(&mut self, pos: Position) -> InputOutcome {
        if self.is_processing() || !self.board.contains(pos) {
            return InputOutcome::Ignored;
        }

        match self.selection.input(pos) {
            SelectionOutcome::Armed(armed) => InputOutcome::Armed(armed),
            SelectionOutcome::Disarmed => InputOutcome::Disarmed,
            SelectionOutcome::SwapRequested { first, second } => self.request_swap(first, second),
        }
    }

    /// Applies the swap speculatively when the cells are adjacent; otherwise
    /// re-aims the selection at `second`.
    pub fn request_swap(&mut self, first: Position, second: Position) -> InputOutcome {
        if self.is_processing() {
            return InputOutcome::Ignored;
        }

        let in_range = self.board.contains(first) && self.board.contains(second);
        if !in_range || !first.is_adjacent(second) {
            if !self.board.contains(second) {
                return InputOutcome::Ignored;
            }
            self.selection = Selection::Armed(second);
            return InputOutcome::Reaimed(second);
        }

        self.selection = Selection::Idle;
        if self.phase == Phase::ComboFading {
            self.combo = 0;
        }

        self.board.swap(first, second);
        let matched = find_matches(&self.board).has_matches();
        self.phase = Phase::SwapShown {
            first,
            second,
            matched,
        };

        InputOutcome::SwapAccepted {
            first,
            second,
            matched,
        }
    }

    /// Runs the step the current pace was waiting for. `None` when idle.
    pub fn advance(
        &mut self,
        rng: &mut SessionRng,
        handler: &mut impl MatchHandler,
    ) -> Option<EngineStep> {
        let step = match self.phase {
            Phase::Idle => return None,
            Phase::SwapShown {
                first,
                second,
                matched: false,
            } => {
                self.board.swap(first, second);
                self.phase = Phase::Idle;
                EngineStep::SwapReverted { first, second }
            }
            Phase::SwapShown { matched: true, .. } => {
                self.swaps_made += 1;
                self.combo = 0;
                self.check_board(rng, handler)
            }
            Phase::Clearing => {
                let (moves, spawned) = self.board.collapse_and_refill(self.palette(), rng);
                self.phase = Phase::Dropped;
                EngineStep::Dropped { moves, spawned }
            }
            Phase::Dropped => self.check_board(rng, handler),
            Phase::ComboFading => {
                self.combo = 0;
                self.phase = Phase::Idle;
                EngineStep::ComboReset
            }
        };
        Some(step)
    }

    /// Steps until the cascade settles or the swap reverts, leaving any
    /// combo fade pending.
    pub fn run_to_settle(
        &mut self,
        rng: &mut SessionRng,
        handler: &mut impl MatchHandler,
    ) -> Vec<EngineStep> {
        let mut steps = Vec::new();
        while self.is_processing() {
            match self.advance(rng, handler) {
                Some(step) => steps.push(step),
                None => break,
            }
        }
        steps
    }

    /// Regenerates the board while no swap on it would match. Returns whether
    /// anything changed. Gives up after a bounded number of layouts.
    pub fn reshuffle_if_stuck(&mut self, rng: &mut SessionRng) -> bool {
        if !self.settings.reshuffle_when_stuck || has_valid_swap(&self.board) {
            return false;
        }

        for _ in 0..MAX_GENERATION_ATTEMPTS {
            self.board.regenerate(self.palette(), rng);
            if has_valid_swap(&self.board) {
                break;
            }
        }
        true
    }

    pub fn snapshot(&self) -> Match3Snapshot {
        Match3Snapshot {
            size: self.board.size(),
            cells: self.board.cells().to_vec(),
            selection: self.selection.position(),
            processing: self.is_processing(),
            combo: self.combo,
        }
    }

    fn check_board(&mut self, rng: &mut SessionRng, handler: &mut impl MatchHandler) -> EngineStep {
        match resolve_step(&mut self.board, self.combo) {
            CascadeStep::Cleared(event) => {
                self.combo = event.combo;
                handler.on_match(&event);
                self.phase = Phase::Clearing;
                EngineStep::Cleared(event)
            }
            CascadeStep::Stable => {
                let reshuffled = self.reshuffle_if_stuck(rng);
                self.phase = if self.combo > 0 {
                    Phase::ComboFading
                } else {
                    Phase::Idle
                };
                EngineStep::Settled {
                    combo: self.combo,
                    reshuffled,
                }
            }
        }
    }
}
