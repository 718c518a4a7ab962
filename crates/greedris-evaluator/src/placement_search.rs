//! Placement search: choosing where the falling piece should land.
//!
//! # How It Works
//!
//! 1. **Enumerate** - For every rotation `r` of the piece and every horizontal
//!    offset the rotation allows, build a candidate at the falling piece's current
//!    vertical offset.
//! 2. **Drop** - Move each candidate straight down to its resting position.
//! 3. **Score** - Lock the candidate into a copy of the board, clear full rows and
//!    ask the [`PlacementEvaluator`] for a cost.
//! 4. **Select** - Keep the cheapest candidate. Ties keep the one found first,
//!    i.e. the lowest rotation, then the lowest offset.
//!
//! The live board is only read. Each candidate gets its own copy.
//!
//! # Failure
//!
//! [`PlacementSearch::best_placement`] never fails: on a board where the piece
//! no longer fits, it still returns the least bad candidate.
//! [`PlacementSearch::try_best_placement`] checks the falling piece first and
//! reports [`SearchError::ToppedOut`] instead.

use greedris_engine::{Board, Piece, Placement, ShapeKind};
use serde::Serialize;

use crate::{
    placement_analysis::PlacementAnalysis,
    placement_evaluator::{HeuristicEvaluator, PlacementEvaluator},
};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum SearchError {
    #[display("{kind} piece does not fit at {x},{y}: the board is topped out")]
    ToppedOut { kind: ShapeKind, x: i32, y: i32 },
}

/// The winning candidate of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub placement: Placement,
    /// The piece at its resting position.
    pub resting: Piece,
    pub cost: u32,
    pub cleared_lines: usize,
}

/// Greedy one-piece search driven by a [`PlacementEvaluator`].
#[derive(Debug)]
pub struct PlacementSearch<'a> {
    placement_evaluator: Box<dyn PlacementEvaluator + 'a>,
}

impl Default for PlacementSearch<'_> {
    fn default() -> Self {
        Self::new(Box::new(HeuristicEvaluator::default()))
    }
}

impl<'a> PlacementSearch<'a> {
    #[must_use]
    pub fn new(placement_evaluator: Box<dyn PlacementEvaluator + 'a>) -> Self {
        Self {
            placement_evaluator,
        }
    }

    /// Returns the lowest-cost placement of `piece` on `board`.
    ///
    /// Always returns a placement, even when `piece` already collides with the
    /// board.
    #[must_use]
    pub fn best_placement(&self, board: &Board, piece: &Piece) -> Placement {
        self.search(board, piece).placement
    }

    /// Like [`Self::best_placement`], but rejects a falling piece that does not
    /// fit where it currently is.
    pub fn try_best_placement(
        &self,
        board: &Board,
        piece: &Piece,
    ) -> Result<SearchResult, SearchError> {
        if !board.is_valid(piece) {
            return Err(SearchError::ToppedOut {
                kind: piece.kind(),
                x: piece.x(),
                y: piece.y(),
            });
        }
        Ok(self.search(board, piece))
    }

    /// Scores every candidate and returns the winner with its cost.
    #[must_use]
    pub fn search(&self, board: &Board, piece: &Piece) -> SearchResult {
        let best = candidates(board, piece)
            .map(|(placement, resting)| self.evaluate(board, placement, resting))
            .inspect(|result| {
                tracing::trace!(
                    rotation = result.placement.rotation,
                    offset = result.placement.offset,
                    cost = result.cost,
                    "candidate"
                );
            })
            // `min_by_key` keeps the first of equal minima
            .min_by_key(|result| result.cost);

        let best = best.unwrap_or_else(|| {
            // every shape has at least one legal offset, so this only happens
            // for a piece outside the catalog rules
            let placement = Placement::new(piece.rotation(), piece.x());
            self.evaluate(board, placement, piece.simulate_drop_position(board))
        });
        tracing::debug!(
            shape = %piece.kind(),
            rotation = best.placement.rotation,
            offset = best.placement.offset,
            cost = best.cost,
            cleared_lines = best.cleared_lines,
            "best placement"
        );
        best
    }

    fn evaluate(&self, board: &Board, placement: Placement, resting: Piece) -> SearchResult {
        let analysis = PlacementAnalysis::from_board(board, resting);
        SearchResult {
            placement,
            resting,
            cost: self.placement_evaluator.evaluate_cost(&analysis),
            cleared_lines: analysis.cleared_lines(),
        }
    }
}

/// Lowest-cost placement under the default heuristic.
///
/// # Example
///
/// ```
/// use greedris_engine::{Board, Piece, Placement, ShapeKind};
/// use greedris_evaluator::placement_search::best_placement;
///
/// // the square lands against the left wall on an empty board
/// let placement = best_placement(&Board::EMPTY, &Piece::spawn(ShapeKind::O));
/// assert_eq!(placement, Placement::new(0, -1));
/// ```
#[must_use]
pub fn best_placement(board: &Board, piece: &Piece) -> Placement {
    PlacementSearch::default().best_placement(board, piece)
}

/// Every `(rotation, offset)` candidate with its resting position, in search
/// order.
pub fn candidates<'a>(
    board: &'a Board,
    piece: &Piece,
) -> impl Iterator<Item = (Placement, Piece)> + use<'a> {
    let piece = *piece;
    (0..piece.kind().num_rotations()).flat_map(move |rotation| {
        let scratch = piece.with_rotation(rotation);
        scratch.offset_range().map(move |offset| {
            let resting = scratch
                .with_position(offset, piece.y())
                .simulate_drop_position(board);
            (Placement::new(rotation, offset), resting)
        })
    })
}

#[cfg(test)]
mod tests {
    use greedris_engine::{BOARD_WIDTH, Block};

    use crate::placement_evaluator::CostWeights;

    use super::*;

    #[test]
    fn test_candidates_cover_every_rotation_and_offset() {
        let board = Board::EMPTY;
        let count = |kind: ShapeKind| candidates(&board, &Piece::spawn(kind)).count();
        // three-wide rotations have 8 offsets, two-wide ones 9
        assert_eq!(count(ShapeKind::T), 8 + 9 + 8 + 9);
        assert_eq!(count(ShapeKind::O), 9);
        assert_eq!(count(ShapeKind::I), 7 + 10);
    }

    #[test]
    fn test_candidates_start_from_the_falling_row() {
        let board = Board::EMPTY;
        let piece = Piece::spawn(ShapeKind::T).with_position(5, 3);
        let (placement, resting) = candidates(&board, &piece).next().unwrap();
        assert_eq!(placement, Placement::new(0, 0));
        assert_eq!(resting.x(), 0);
        assert!(resting.y() >= 3);
    }

    #[test]
    fn test_search_does_not_touch_the_board() {
        let board = Board::from_ascii("####.#####").unwrap();
        let before = board.clone();
        let result = PlacementSearch::default().search(&board, &Piece::spawn(ShapeKind::I));
        assert_eq!(board, before);
        assert_eq!(result.cleared_lines, 1);
        assert_eq!(result.placement, Placement::new(1, 3));
    }

    #[test]
    fn test_ties_keep_the_first_candidate() {
        #[derive(Debug)]
        struct Flat;
        impl PlacementEvaluator for Flat {
            fn evaluate_cost(&self, _analysis: &PlacementAnalysis) -> u32 {
                7
            }
        }

        let search = PlacementSearch::new(Box::new(Flat));
        let result = search.search(&Board::EMPTY, &Piece::spawn(ShapeKind::L));
        assert_eq!(result.placement, Placement::new(0, 0));
        assert_eq!(result.cost, 7);
    }

    #[test]
    fn test_fills_the_well() {
        // a one-wide well at the right wall
        let board = Board::from_ascii(
            "
            #########.
            #########.
            ",
        )
        .unwrap();
        let result = PlacementSearch::default().search(&board, &Piece::spawn(ShapeKind::I));
        assert_eq!(result.placement, Placement::new(1, 8));
        assert_eq!(result.cleared_lines, 2);
        // two cells of column 9 remain
        assert_eq!(result.cost, 2 + 2 * 2);
    }

    #[test]
    fn test_custom_weights_change_the_choice() {
        let board = Board::from_ascii("#.........").unwrap();
        let piece = Piece::spawn(ShapeKind::I);

        let default = PlacementSearch::default().search(&board, &piece);
        assert_eq!(default.placement, Placement::new(0, 1));

        let indifferent = CostWeights {
            height: 0,
            bumpiness: 0,
            holes: 0,
        };
        let search = PlacementSearch::new(Box::new(HeuristicEvaluator::new(indifferent)));
        let result = search.search(&board, &piece);
        assert_eq!(result.placement, Placement::new(0, 0));
        assert_eq!(result.cost, 0);
    }

    #[test]
    fn test_topped_out_board() {
        let mut board = Board::EMPTY;
        for x in 0..BOARD_WIDTH - 1 {
            for y in 0..3 {
                board.set_cell(x, y, Block::Filled);
            }
        }
        let piece = Piece::spawn(ShapeKind::T);
        assert!(!board.is_valid(&piece));

        let search = PlacementSearch::default();
        let err = search.try_best_placement(&board, &piece).unwrap_err();
        assert!(matches!(
            err,
            SearchError::ToppedOut {
                kind: ShapeKind::T,
                ..
            }
        ));

        // the lenient entry point still answers
        let placement = search.best_placement(&board, &piece);
        assert!(placement.rotation < ShapeKind::T.num_rotations());
    }
}
