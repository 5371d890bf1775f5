mod board;
mod bot_controller;
mod cascade;
mod detector;
mod game_state;
mod selection;
mod settings;
mod types;

pub use board::Board;
pub use bot_controller::{
    BotType, SwapCandidate, calculate_swap, find_valid_swaps, has_valid_swap, hint,
};
pub use cascade::{CascadeStep, resolve_step, run_cascade};
pub use detector::{MatchRun, MatchScan, Orientation, find_matches};
pub use game_state::{EngineStep, InputOutcome, Match3GameState, Match3Snapshot};
pub use selection::{Selection, SelectionOutcome};
pub use settings::Match3Settings;
pub use types::{
    BOARD_SIZE, ClearedCell, Gem, GemId, GemKind, GemMove, MAX_GENERATION_ATTEMPTS, MIN_RUN,
    MatchEvent, MatchHandler, Position, SpecialMarker,
};
