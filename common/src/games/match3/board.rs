use super::types::{Gem, GemId, GemKind, GemMove, MAX_GENERATION_ATTEMPTS, MIN_RUN, Position};
use crate::games::session_rng::SessionRng;

/// Square grid of gems stored row-major. Every cell always holds a gem;
/// cleared cells hold a gem with no kind until gravity refills them.
#[derive(Clone, Debug)]
pub struct Board {
    cells: Vec<Gem>,
    size: usize,
    next_id: u64,
}

impl Board {
    /// Fills the board row-major so that no cell completes a run with the two
    /// cells before it in its row or column.
    pub fn generate(size: usize, palette: &[GemKind], rng: &mut SessionRng) -> Self {
        Self::generate_from(size, palette, rng, 0)
    }

    /// Replaces every gem with a freshly generated layout. Ids keep counting
    /// up from the old board so none is reused.
    pub fn regenerate(&mut self, palette: &[GemKind], rng: &mut SessionRng) {
        *self = Self::generate_from(self.size, palette, rng, self.next_id);
    }

    fn generate_from(
        size: usize,
        palette: &[GemKind],
        rng: &mut SessionRng,
        first_id: u64,
    ) -> Self {
        let mut board = Self {
            cells: Vec::with_capacity(size * size),
            size,
            next_id: first_id,
        };

        for row in 0..size {
            for col in 0..size {
                let kind = board.pick_opening_kind(Position::new(row, col), palette, rng);
                let gem = board.spawn(kind);
                board.cells.push(gem);
            }
        }

        board
    }

    /// Builds a board from explicit rows; every row must be as long as there
    /// are rows.
    pub fn from_rows(rows: &[Vec<GemKind>]) -> Result<Self, String> {
        let size = rows.len();
        if let Some((index, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != size) {
            return Err(format!(
                "Row {} has {} cells, expected {}",
                index,
                row.len(),
                size
            ));
        }

        let mut board = Self {
            cells: Vec::with_capacity(size * size),
            size,
            next_id: 0,
        };
        for kind in rows.iter().flatten() {
            let gem = board.spawn(*kind);
            board.cells.push(gem);
        }
        Ok(board)
    }

    /// Rebuilds a board from a row-major cell list, such as a snapshot's.
    pub fn from_cells(size: usize, cells: Vec<Gem>) -> Result<Self, String> {
        if cells.len() != size * size {
            return Err(format!(
                "Expected {} cells for a {}x{} board, got {}",
                size * size,
                size,
                size,
                cells.len()
            ));
        }

        let next_id = cells.iter().map(|gem| gem.id.0 + 1).max().unwrap_or(0);
        Ok(Self {
            cells,
            size,
            next_id,
        })
    }

    fn pick_opening_kind(
        &self,
        pos: Position,
        palette: &[GemKind],
        rng: &mut SessionRng,
    ) -> GemKind {
        for _ in 0..MAX_GENERATION_ATTEMPTS {
            if let Some(&kind) = rng.choose(palette)
                && !self.completes_run_behind(pos, kind)
            {
                return kind;
            }
        }

        self.fallback_kind(pos, palette)
    }

    /// First palette kind that completes no run at `pos`. At most two kinds
    /// are ruled out per cell, so a palette of three always has one.
    fn fallback_kind(&self, pos: Position, palette: &[GemKind]) -> GemKind {
        palette
            .iter()
            .copied()
            .find(|&kind| !self.completes_run_behind(pos, kind))
            .or_else(|| palette.first().copied())
            .unwrap_or(GemKind::Red)
    }

    /// Whether `kind` at `pos` would extend the two cells to its left or the
    /// two cells above it into a run.
    fn completes_run_behind(&self, pos: Position, kind: GemKind) -> bool {
        let behind = MIN_RUN - 1;
        let same = |p: Position| self.kind_at(p) == Some(kind);

        let horizontal = pos.col >= behind
            && (1..=behind).all(|step| same(Position::new(pos.row, pos.col - step)));
        let vertical = pos.row >= behind
            && (1..=behind).all(|step| same(Position::new(pos.row - step, pos.col)));

        horizontal || vertical
    }

    fn spawn(&mut self, kind: GemKind) -> Gem {
        let id = GemId(self.next_id);
        self.next_id += 1;
        Gem::new(id, kind)
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if pos.row >= self.size || pos.col >= self.size {
            return None;
        }
        Some(pos.row * self.size + pos.col)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.index(pos).is_some()
    }

    pub fn get(&self, pos: Position) -> Option<&Gem> {
        self.index(pos).and_then(|index| self.cells.get(index))
    }

    pub fn get_mut(&mut self, pos: Position) -> Option<&mut Gem> {
        let index = self.index(pos)?;
        self.cells.get_mut(index)
    }

    pub fn kind_at(&self, pos: Position) -> Option<GemKind> {
        self.get(pos).and_then(|gem| gem.kind)
    }

    pub fn cells(&self) -> &[Gem] {
        &self.cells
    }

    /// Kinds only, row by row; what the match rules care about.
    pub fn kinds(&self) -> Vec<Vec<Option<GemKind>>> {
        self.cells
            .chunks(self.size.max(1))
            .map(|row| row.iter().map(|gem| gem.kind).collect())
            .collect()
    }

    pub fn has_empty(&self) -> bool {
        self.cells.iter().any(Gem::is_empty)
    }

    /// Exchanges two cells. Returns false, leaving the board untouched, when
    /// either position is off the board.
    pub fn swap(&mut self, first: Position, second: Position) -> bool {
        match (self.index(first), self.index(second)) {
            (Some(a), Some(b)) => {
                self.cells.swap(a, b);
                true
            }
            _ => false,
        }
    }

    /// Marks cells as cleared. Ids stay in place until gravity replaces them.
    pub fn clear<'a>(&mut self, positions: impl IntoIterator<Item = &'a Position>) {
        for pos in positions {
            if let Some(gem) = self.get_mut(*pos) {
                gem.kind = None;
            }
        }
    }

    /// Drops every remaining gem as far down its column as it goes, keeping
    /// the column's order, then fills the vacated top cells with new gems.
    /// Refills may form new runs; that is what chains combos.
    pub fn collapse_and_refill(
        &mut self,
        palette: &[GemKind],
        rng: &mut SessionRng,
    ) -> (Vec<GemMove>, Vec<Position>) {
        let mut moves = Vec::new();
        let mut spawned = Vec::new();

        for col in 0..self.size {
            let mut write_row = self.size;
            for row in (0..self.size).rev() {
                let from = Position::new(row, col);
                let Some(gem) = self.get(from).copied() else {
                    continue;
                };
                if gem.is_empty() {
                    continue;
                }

                write_row -= 1;
                if write_row != row {
                    let to = Position::new(write_row, col);
                    if let Some(target) = self.get_mut(to) {
                        *target = gem;
                    }
                    moves.push(GemMove {
                        id: gem.id,
                        from,
                        to,
                    });
                }
            }

            for row in 0..write_row {
                let Some(&kind) = rng.choose(palette) else {
                    continue;
                };
                let gem = self.spawn(kind);
                let pos = Position::new(row, col);
                if let Some(target) = self.get_mut(pos) {
                    *target = gem;
                }
                spawned.push(pos);
            }
        }

        (moves, spawned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::match3::detector::find_matches;
    use crate::games::match3::types::GemKind::{
        Blue as B, Cyan as C, Green as G, Purple as P, Red as R, Yellow as Y,
    };

    fn has_any_run(board: &Board) -> bool {
        find_matches(board).has_matches()
    }

    #[test]
    fn test_generate_has_no_runs_across_seeds_sizes_and_palettes() {
        for seed in 0..200u64 {
            for size in 3..=10 {
                for palette_size in 3..=6 {
                    let mut rng = SessionRng::new(seed);
                    let board = Board::generate(size, GemKind::palette(palette_size), &mut rng);

                    assert_eq!(board.cells().len(), size * size);
                    assert!(!board.has_empty());
                    assert!(
                        !has_any_run(&board),
                        "seed {} size {} palette {} produced a run",
                        seed,
                        size,
                        palette_size
                    );
                }
            }
        }
    }

    #[test]
    fn test_generate_only_uses_palette_kinds() {
        let mut rng = SessionRng::new(11);
        let palette = GemKind::palette(4);
        let board = Board::generate(8, palette, &mut rng);

        assert!(
            board
                .cells()
                .iter()
                .all(|gem| gem.kind.is_some_and(|kind| palette.contains(&kind)))
        );
    }

    #[test]
    fn test_generate_assigns_unique_ids() {
        let mut rng = SessionRng::new(5);
        let board = Board::generate(8, &GemKind::ALL, &mut rng);

        let mut ids: Vec<GemId> = board.cells().iter().map(|gem| gem.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 64);
    }

    #[test]
    fn test_regenerate_keeps_ids_fresh() {
        let mut rng = SessionRng::new(8);
        let mut board = Board::generate(6, &GemKind::ALL, &mut rng);
        let old_ids: Vec<GemId> = board.cells().iter().map(|gem| gem.id).collect();

        board.regenerate(&GemKind::ALL, &mut rng);

        assert_eq!(board.size(), 6);
        assert!(!has_any_run(&board));
        assert!(board.cells().iter().all(|gem| !old_ids.contains(&gem.id)));
    }

    #[test]
    fn test_fallback_skips_both_blocked_kinds() {
        #[rustfmt::skip]
        let board = Board::from_rows(&[
            vec![Y, G, B],
            vec![C, P, B],
            vec![R, R, Y],
        ]).unwrap();
        let corner = Position::new(2, 2);
        let palette = GemKind::palette(3);

        assert!(board.completes_run_behind(corner, R));
        assert!(board.completes_run_behind(corner, B));

        let kind = board.fallback_kind(corner, palette);

        assert_eq!(kind, G);
        assert!(!board.completes_run_behind(corner, kind));
    }

    #[test]
    fn test_from_rows_rejects_ragged_rows() {
        let result = Board::from_rows(&[vec![R, G, B], vec![R, G], vec![B, B, R]]);

        assert!(result.is_err());
    }

    #[test]
    fn test_from_cells_round_trips_snapshot_cells() {
        let mut rng = SessionRng::new(4);
        let board = Board::generate(5, &GemKind::ALL, &mut rng);

        let rebuilt = Board::from_cells(5, board.cells().to_vec()).unwrap();

        assert_eq!(rebuilt.kinds(), board.kinds());
        assert!(Board::from_cells(4, board.cells().to_vec()).is_err());
    }

    #[test]
    fn test_swap_exchanges_cells() {
        let mut board = Board::from_rows(&[vec![R, G, B], vec![Y, P, C], vec![B, R, G]]).unwrap();

        assert!(board.swap(Position::new(0, 0), Position::new(0, 1)));

        assert_eq!(board.kind_at(Position::new(0, 0)), Some(G));
        assert_eq!(board.kind_at(Position::new(0, 1)), Some(R));
    }

    #[test]
    fn test_swap_out_of_range_leaves_board() {
        let mut board = Board::from_rows(&[vec![R, G, B], vec![Y, P, C], vec![B, R, G]]).unwrap();
        let before = board.kinds();

        assert!(!board.swap(Position::new(0, 0), Position::new(0, 3)));

        assert_eq!(board.kinds(), before);
    }

    #[test]
    fn test_collapse_preserves_column_order_and_refills_top() {
        #[rustfmt::skip]
        let mut board = Board::from_rows(&[
            vec![R, G, B],
            vec![Y, P, C],
            vec![B, R, G],
        ]).unwrap();
        let top_id = board.get(Position::new(0, 0)).unwrap().id;
        board.clear(&[Position::new(1, 0), Position::new(2, 0)]);

        let mut rng = SessionRng::new(1);
        let (moves, spawned) = board.collapse_and_refill(&[C], &mut rng);

        assert_eq!(board.kind_at(Position::new(2, 0)), Some(R));
        assert_eq!(board.get(Position::new(2, 0)).unwrap().id, top_id);
        assert_eq!(board.kind_at(Position::new(0, 0)), Some(C));
        assert_eq!(board.kind_at(Position::new(1, 0)), Some(C));
        assert_eq!(spawned, vec![Position::new(0, 0), Position::new(1, 0)]);
        assert_eq!(
            moves,
            vec![GemMove {
                id: top_id,
                from: Position::new(0, 0),
                to: Position::new(2, 0),
            }]
        );
        assert_eq!(board.kind_at(Position::new(2, 1)), Some(R));
        assert!(!board.has_empty());
    }

    #[test]
    fn test_collapse_keeps_gaps_order_in_middle_of_column() {
        #[rustfmt::skip]
        let mut board = Board::from_rows(&[
            vec![R, G, B, Y],
            vec![G, P, C, B],
            vec![B, R, G, P],
            vec![Y, C, R, G],
        ]).unwrap();
        board.clear(&[Position::new(1, 0), Position::new(3, 0)]);

        let mut rng = SessionRng::new(2);
        board.collapse_and_refill(&[P], &mut rng);

        let column: Vec<Option<GemKind>> =
            (0..4).map(|row| board.kind_at(Position::new(row, 0))).collect();
        assert_eq!(column, vec![Some(P), Some(P), Some(R), Some(B)]);
    }

    #[test]
    fn test_refilled_gems_get_fresh_ids() {
        let mut board = Board::from_rows(&[vec![R, G, B], vec![Y, P, C], vec![B, R, G]]).unwrap();
        let old_ids: Vec<GemId> = board.cells().iter().map(|gem| gem.id).collect();
        board.clear(&[Position::new(0, 1)]);

        let mut rng = SessionRng::new(3);
        let (_, spawned) = board.collapse_and_refill(&GemKind::ALL, &mut rng);

        assert_eq!(spawned, vec![Position::new(0, 1)]);
        let new_id = board.get(Position::new(0, 1)).unwrap().id;
        assert!(!old_ids.contains(&new_id));
    }
}
