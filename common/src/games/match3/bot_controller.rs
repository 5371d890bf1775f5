use serde::{Deserialize, Serialize};

use super::board::Board;
use super::detector::find_matches;
use super::types::Position;
use crate::games::SessionRng;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BotType {
    Random,
    Greedy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwapCandidate {
    pub first: Position,
    pub second: Position,
    /// Cells the swap clears before any cascade.
    pub cleared: usize,
}

/// Right and down neighbour pairs whose kinds differ; swapping equal kinds
/// cannot change anything.
fn swap_pairs(board: &Board) -> impl Iterator<Item = (Position, Position)> + '_ {
    let size = board.size();
    (0..size)
        .flat_map(move |row| (0..size).map(move |col| Position::new(row, col)))
        .flat_map(|pos| {
            [
                Position::new(pos.row, pos.col + 1),
                Position::new(pos.row + 1, pos.col),
            ]
            .into_iter()
            .map(move |neighbour| (pos, neighbour))
        })
        .filter(|&(first, second)| {
            let (Some(a), Some(b)) = (board.kind_at(first), board.kind_at(second)) else {
                return false;
            };
            a != b
        })
}

fn probe(scratch: &mut Board, first: Position, second: Position) -> usize {
    scratch.swap(first, second);
    let cleared = find_matches(scratch).positions.len();
    scratch.swap(first, second);
    cleared
}

pub fn find_valid_swaps(board: &Board) -> Vec<SwapCandidate> {
    let mut scratch = board.clone();
    swap_pairs(board)
        .filter_map(|(first, second)| {
            let cleared = probe(&mut scratch, first, second);
            (cleared > 0).then_some(SwapCandidate {
                first,
                second,
                cleared,
            })
        })
        .collect()
}

pub fn has_valid_swap(board: &Board) -> bool {
    let mut scratch = board.clone();
    swap_pairs(board).any(|(first, second)| probe(&mut scratch, first, second) > 0)
}

/// The swap that clears the most cells right away, earliest in scan order on
/// ties.
pub fn hint(board: &Board) -> Option<SwapCandidate> {
    find_valid_swaps(board)
        .into_iter()
        .fold(None, |best: Option<SwapCandidate>, candidate| match best {
            Some(current) if current.cleared >= candidate.cleared => Some(current),
            _ => Some(candidate),
        })
}

pub fn calculate_swap(
    bot_type: BotType,
    board: &Board,
    rng: &mut SessionRng,
) -> Option<SwapCandidate> {
    match bot_type {
        BotType::Random => rng.choose(&find_valid_swaps(board)).copied(),
        BotType::Greedy => hint(board),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::match3::types::GemKind;
    use crate::games::match3::types::GemKind::{
        Blue as B, Cyan as C, Green as G, Purple as P, Red as R, Yellow as Y,
    };

    fn two_option_board() -> Board {
        // (0,2)<->(1,2) completes a red row of three;
        // (2,0)<->(2,1) completes a green column of four.
        #[rustfmt::skip]
        let board = Board::from_rows(&[
            vec![R, R, B, Y, C],
            vec![G, B, R, C, P],
            vec![P, G, C, Y, B],
            vec![G, Y, B, P, Y],
            vec![G, P, Y, C, P],
        ]).unwrap();
        board
    }

    #[test]
    fn test_find_valid_swaps_lists_matching_swaps_only() {
        let board = two_option_board();

        let swaps = find_valid_swaps(&board);

        assert!(!swaps.is_empty());
        let mut scratch = board.clone();
        for swap in &swaps {
            assert!(swap.first.is_adjacent(swap.second));
            scratch.swap(swap.first, swap.second);
            assert!(find_matches(&scratch).has_matches());
            scratch.swap(swap.first, swap.second);
        }
    }

    #[test]
    fn test_hint_prefers_larger_clear() {
        let board = two_option_board();

        let best = hint(&board).unwrap();

        assert_eq!(best.first, Position::new(2, 0));
        assert_eq!(best.second, Position::new(2, 1));
        assert_eq!(best.cleared, 4);
    }

    #[test]
    fn test_no_valid_swap_on_paired_board() {
        // Only horizontal pairs, and no cell next to a pair's end holds the
        // pair's kind.
        #[rustfmt::skip]
        let board = Board::from_rows(&[
            vec![R, R, G, G],
            vec![B, B, Y, Y],
            vec![G, G, R, R],
            vec![Y, Y, B, B],
        ]).unwrap();

        assert!(find_valid_swaps(&board).is_empty());
        assert!(!has_valid_swap(&board));
        assert!(hint(&board).is_none());
    }

    #[test]
    fn test_random_bot_picks_a_valid_swap() {
        let board = two_option_board();
        let valid = find_valid_swaps(&board);
        let mut rng = SessionRng::new(17);

        for _ in 0..20 {
            let pick = calculate_swap(BotType::Random, &board, &mut rng).unwrap();
            assert!(valid.contains(&pick));
        }
    }

    #[test]
    fn test_generated_boards_mostly_have_moves() {
        let mut with_moves = 0;
        for seed in 0..50u64 {
            let mut rng = SessionRng::new(seed);
            let board = Board::generate(8, &GemKind::ALL, &mut rng);
            if has_valid_swap(&board) {
                with_moves += 1;
            }
        }
        assert!(with_moves > 40);
    }
}
