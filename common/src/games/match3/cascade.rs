use super::board::Board;
use super::detector::find_matches;
use super::types::{GemKind, MatchEvent, MatchHandler};
use crate::games::session_rng::SessionRng;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CascadeStep {
    /// Matches were found and their cells are now empty.
    Cleared(MatchEvent),
    /// Nothing left to clear.
    Stable,
}

/// One detection pass. On a match the matched cells are emptied and the
/// event carries `combo + 1`; gravity is left to the caller.
pub fn resolve_step(board: &mut Board, combo: u32) -> CascadeStep {
    let scan = find_matches(board);
    let Some(gem_kind) = scan.match_kind else {
        return CascadeStep::Stable;
    };

    let event = MatchEvent {
        cleared_count: scan.match_count,
        combo: combo + 1,
        gem_kind,
        cleared: scan.cleared_cells(board),
    };
    board.clear(&scan.positions);

    CascadeStep::Cleared(event)
}

/// Runs clear, gravity and refill back to back until the board is stable,
/// without any pacing. Returns the final combo.
pub fn run_cascade(
    board: &mut Board,
    palette: &[GemKind],
    rng: &mut SessionRng,
    handler: &mut impl MatchHandler,
) -> u32 {
    let mut combo = 0;
    while let CascadeStep::Cleared(event) = resolve_step(board, combo) {
        handler.on_match(&event);
        combo = event.combo;
        board.collapse_and_refill(palette, rng);
    }
    combo
}
