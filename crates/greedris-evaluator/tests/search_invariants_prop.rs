//! Property tests for the search and the heuristic cost.

use greedris_engine::{BOARD_HEIGHT, BOARD_WIDTH, Block, Board, Piece, ShapeKind};
use greedris_evaluator::{
    board_analysis::BoardAnalysis,
    placement_evaluator::CostWeights,
    placement_search::{PlacementSearch, candidates},
};
use proptest::prelude::*;

/// Solid columns of the given heights, no holes.
fn stack(heights: &[usize; BOARD_WIDTH]) -> Board {
    let mut board = Board::EMPTY;
    for (x, h) in heights.iter().enumerate() {
        for y in BOARD_HEIGHT - h..BOARD_HEIGHT {
            board.set_cell(x, y, Block::Filled);
        }
    }
    board
}

fn cost(board: &Board) -> i64 {
    i64::from(CostWeights::DEFAULT.cost(&BoardAnalysis::from_board(board)))
}

fn heights_strategy() -> impl Strategy<Value = [usize; BOARD_WIDTH]> {
    prop::array::uniform10(0..=14usize)
}

fn kind_strategy() -> impl Strategy<Value = ShapeKind> {
    prop::sample::select(ShapeKind::ALL.to_vec())
}

proptest! {
    #[test]
    fn every_candidate_is_at_rest(heights in heights_strategy(), kind in kind_strategy()) {
        let board = stack(&heights);
        let piece = Piece::spawn(kind);
        for (placement, resting) in candidates(&board, &piece) {
            prop_assert!(board.is_valid(&resting), "{placement:?} is not valid");
            prop_assert!(!board.is_valid(&resting.down()), "{placement:?} can still fall");
            prop_assert_eq!(resting.rotation(), placement.rotation);
            prop_assert_eq!(resting.x(), placement.offset);
        }
    }

    #[test]
    fn search_picks_the_first_minimum(heights in heights_strategy(), kind in kind_strategy()) {
        let board = stack(&heights);
        let piece = Piece::spawn(kind);
        let search = PlacementSearch::default();
        let result = search.search(&board, &piece);

        let mut best: Option<(u32, _)> = None;
        for (placement, resting) in candidates(&board, &piece) {
            let mut after = board.clone();
            after.lock(&resting, resting.kind());
            after.clear_full_rows();
            let cost = CostWeights::DEFAULT.cost(&BoardAnalysis::from_board(&after));
            if best.is_none_or(|(best_cost, _)| cost < best_cost) {
                best = Some((cost, placement));
            }
        }
        prop_assert_eq!(Some((result.cost, result.placement)), best);
    }

    #[test]
    fn a_new_hole_costs_exactly_twenty(
        heights in heights_strategy(),
        column in 0..BOARD_WIDTH,
        depth in 1usize..14,
    ) {
        let h = heights[column];
        prop_assume!(depth < h);
        let board = stack(&heights);
        let mut holed = board.clone();
        holed.set_cell(column, BOARD_HEIGHT - h + depth, Block::Empty);

        prop_assert_eq!(cost(&holed) - cost(&board), 20);
    }

    #[test]
    fn raising_a_column_costs_one_plus_two_per_bump(
        heights in heights_strategy(),
        column in 0..BOARD_WIDTH,
    ) {
        let board = stack(&heights);
        let mut raised_heights = heights;
        raised_heights[column] += 1;
        let raised = stack(&raised_heights);

        let bumpiness = |h: &[usize; BOARD_WIDTH]| -> i64 {
            h.windows(2)
                .map(|w| i64::try_from(w[0].abs_diff(w[1])).unwrap())
                .sum()
        };
        let bump_delta = bumpiness(&raised_heights) - bumpiness(&heights);
        prop_assert_eq!(cost(&raised) - cost(&board), 1 + 2 * bump_delta);
    }
}
