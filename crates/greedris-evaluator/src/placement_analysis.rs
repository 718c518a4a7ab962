//! The board as it would look after a placement.
//!
//! [`PlacementAnalysis`] locks a resting piece into a private copy of the board,
//! clears full rows and keeps the result as a [`BoardAnalysis`]. The board it
//! was built from is never touched.

use greedris_engine::{Board, Piece};

use crate::board_analysis::BoardAnalysis;

#[derive(Debug)]
pub struct PlacementAnalysis {
    placement: Piece,
    cleared_lines: usize,
    board_analysis: BoardAnalysis,
}

impl PlacementAnalysis {
    /// Analyzes `placement` (a piece at its resting position) on top of
    /// `before_placement`.
    #[must_use]
    pub fn from_board(before_placement: &Board, placement: Piece) -> Self {
        let mut board = before_placement.clone();
        board.lock(&placement, placement.kind());
        let cleared_lines = board.clear_full_rows();

        Self {
            placement,
            cleared_lines,
            board_analysis: BoardAnalysis::new(board),
        }
    }

    #[must_use]
    pub fn placement(&self) -> &Piece {
        &self.placement
    }

    #[must_use]
    pub fn cleared_lines(&self) -> usize {
        self.cleared_lines
    }

    /// Metrics of the board after the lock and the line clear.
    #[must_use]
    pub fn board_analysis(&self) -> &BoardAnalysis {
        &self.board_analysis
    }
}
