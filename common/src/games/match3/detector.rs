use std::collections::BTreeSet;

use super::board::Board;
use super::types::{ClearedCell, GemKind, MIN_RUN, Position};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchRun {
    pub kind: GemKind,
    pub start: Position,
    pub length: usize,
    pub orientation: Orientation,
}

impl MatchRun {
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.length).map(move |offset| match self.orientation {
            Orientation::Horizontal => Position::new(self.start.row, self.start.col + offset),
            Orientation::Vertical => Position::new(self.start.row + offset, self.start.col),
        })
    }
}

/// Result of one full scan of the board.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchScan {
    /// Qualifying runs, rows top to bottom first, then columns left to right.
    pub runs: Vec<MatchRun>,
    /// Every cell in any run, each listed once.
    pub positions: BTreeSet<Position>,
    /// Sum of run lengths; a cell in both a row run and a column run counts
    /// twice.
    pub match_count: usize,
    /// Kind of the last run scanned.
    pub match_kind: Option<GemKind>,
}

impl MatchScan {
    pub fn has_matches(&self) -> bool {
        !self.runs.is_empty()
    }

    pub fn cleared_cells(&self, board: &Board) -> Vec<ClearedCell> {
        self.positions
            .iter()
            .filter_map(|&position| {
                board
                    .kind_at(position)
                    .map(|kind| ClearedCell { position, kind })
            })
            .collect()
    }

    fn record(&mut self, run: MatchRun) {
        self.positions.extend(run.positions());
        self.match_count += run.length;
        self.match_kind = Some(run.kind);
        self.runs.push(run);
    }
}

pub fn find_matches(board: &Board) -> MatchScan {
    let mut scan = MatchScan::default();
    let size = board.size();

    for row in 0..size {
        scan_line(board, &mut scan, Orientation::Horizontal, |i| {
            Position::new(row, i)
        });
    }
    for col in 0..size {
        scan_line(board, &mut scan, Orientation::Vertical, |i| {
            Position::new(i, col)
        });
    }

    scan
}

/// Walks one row or column, recording each maximal run of `MIN_RUN` or more
/// and resuming right after it. Empty cells never match.
fn scan_line(
    board: &Board,
    scan: &mut MatchScan,
    orientation: Orientation,
    at: impl Fn(usize) -> Position,
) {
    let size = board.size();
    let mut i = 0;

    while i < size {
        let Some(kind) = board.kind_at(at(i)) else {
            i += 1;
            continue;
        };

        let mut length = 1;
        while i + length < size && board.kind_at(at(i + length)) == Some(kind) {
            length += 1;
        }

        if length >= MIN_RUN {
            scan.record(MatchRun {
                kind,
                start: at(i),
                length,
                orientation,
            });
        }
        i += length;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::SessionRng;
    use crate::games::match3::types::GemKind::{
        Blue as B, Cyan as C, Green as G, Purple as P, Red as R, Yellow as Y,
    };

    #[test]
    fn test_no_matches_on_checkerboard() {
        #[rustfmt::skip]
        let board = Board::from_rows(&[
            vec![R, G, R, G],
            vec![G, R, G, R],
            vec![R, G, R, G],
            vec![G, R, G, R],
        ]).unwrap();

        let scan = find_matches(&board);

        assert!(!scan.has_matches());
        assert_eq!(scan.match_count, 0);
        assert_eq!(scan.match_kind, None);
    }

    #[test]
    fn test_horizontal_run_of_four() {
        #[rustfmt::skip]
        let board = Board::from_rows(&[
            vec![R, R, R, R],
            vec![G, B, G, B],
            vec![B, G, B, G],
            vec![G, B, G, B],
        ]).unwrap();

        let scan = find_matches(&board);

        assert_eq!(scan.runs.len(), 1);
        assert_eq!(scan.match_count, 4);
        assert_eq!(scan.match_kind, Some(R));
        assert_eq!(scan.runs[0].orientation, Orientation::Horizontal);
        assert_eq!(scan.positions.len(), 4);
        assert!(scan.positions.contains(&Position::new(0, 3)));
    }

    #[test]
    fn test_vertical_run_at_bottom_edge() {
        #[rustfmt::skip]
        let board = Board::from_rows(&[
            vec![R, G, B, Y],
            vec![G, B, Y, P],
            vec![B, Y, P, P],
            vec![G, B, Y, P],
        ]).unwrap();

        let scan = find_matches(&board);

        assert_eq!(scan.runs.len(), 1);
        assert_eq!(
            scan.runs[0],
            MatchRun {
                kind: P,
                start: Position::new(1, 3),
                length: 3,
                orientation: Orientation::Vertical,
            }
        );
    }

    #[test]
    fn test_cross_counts_shared_cell_per_direction() {
        #[rustfmt::skip]
        let board = Board::from_rows(&[
            vec![G, R, G, B],
            vec![R, R, R, G],
            vec![B, R, B, G],
            vec![G, B, G, B],
        ]).unwrap();

        let scan = find_matches(&board);

        assert_eq!(scan.runs.len(), 2);
        assert_eq!(scan.match_count, 6);
        assert_eq!(scan.positions.len(), 5);
    }

    #[test]
    fn test_last_scanned_kind_is_reported() {
        // Red row run first, then a green column run: green wins.
        #[rustfmt::skip]
        let board = Board::from_rows(&[
            vec![R, R, R, G, B],
            vec![B, Y, C, G, Y],
            vec![Y, C, B, G, C],
            vec![C, B, Y, C, B],
            vec![B, Y, C, B, Y],
        ]).unwrap();

        let scan = find_matches(&board);

        assert_eq!(scan.runs.len(), 2);
        assert_eq!(scan.match_kind, Some(G));
        assert_eq!(scan.match_count, 6);
        let cleared = scan.cleared_cells(&board);
        assert_eq!(cleared.iter().filter(|cell| cell.kind == R).count(), 3);
        assert_eq!(cleared.iter().filter(|cell| cell.kind == G).count(), 3);
    }

    #[test]
    fn test_empty_cells_never_match() {
        #[rustfmt::skip]
        let mut board = Board::from_rows(&[
            vec![R, G, B],
            vec![G, B, R],
            vec![B, R, G],
        ]).unwrap();
        board.clear(&[Position::new(0, 0), Position::new(0, 1), Position::new(0, 2)]);

        assert!(!find_matches(&board).has_matches());
    }

    #[test]
    fn test_two_runs_in_one_row() {
        #[rustfmt::skip]
        let board = Board::from_rows(&[
            vec![R, R, R, B, B, B, G],
            vec![G, B, G, R, G, R, B],
            vec![B, G, B, G, R, G, R],
            vec![G, B, G, R, G, R, B],
            vec![B, G, B, G, R, G, R],
            vec![G, B, G, R, G, R, B],
            vec![B, G, B, G, R, G, R],
        ]).unwrap();

        let scan = find_matches(&board);

        assert_eq!(scan.runs.len(), 2);
        assert_eq!(scan.match_count, 6);
        assert_eq!(scan.match_kind, Some(B));
    }

    #[test]
    fn test_scan_is_idempotent() {
        for seed in 0..50u64 {
            let mut rng = SessionRng::new(seed);
            let mut board = Board::generate(8, &GemKind::ALL, &mut rng);
            board.swap(Position::new(3, 3), Position::new(3, 4));

            assert_eq!(find_matches(&board), find_matches(&board));
        }
    }
}
