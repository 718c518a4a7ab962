//! Column metrics of a locked board.
//!
//! [`BoardAnalysis`] owns a copy of the board and computes each metric on first
//! access, so callers only pay for the metrics they read.

use std::{cell::OnceCell, iter};

use greedris_engine::{BOARD_HEIGHT, BOARD_WIDTH, Board};
use serde::{Deserialize, Serialize};

#[derive(Debug)]
pub struct BoardAnalysis {
    board: Board,
    column_heights: OnceCell<[u32; BOARD_WIDTH]>,
    column_occupied_cells: OnceCell<[u32; BOARD_WIDTH]>,
    max_height: OnceCell<u32>,
    total_height: OnceCell<u32>,
    num_holes: OnceCell<u32>,
    bumpiness: OnceCell<u32>,
}

/// Snapshot of the metrics the cost and the reward are built from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardMetrics {
    pub total_height: u32,
    pub max_height: u32,
    pub bumpiness: u32,
    pub holes: u32,
}

#[expect(clippy::cast_possible_truncation)]
const fn cell_count(n: usize) -> u32 {
    // bounded by the board area
    n as u32
}

impl BoardAnalysis {
    #[must_use]
    pub fn from_board(board: &Board) -> Self {
        Self::new(board.clone())
    }

    #[must_use]
    pub fn new(board: Board) -> Self {
        Self {
            board,
            column_heights: OnceCell::new(),
            column_occupied_cells: OnceCell::new(),
            max_height: OnceCell::new(),
            total_height: OnceCell::new(),
            num_holes: OnceCell::new(),
            bumpiness: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Height of each column: the distance from the floor to the top of its
    /// highest occupied cell, or 0 for an empty column.
    #[must_use]
    pub fn column_heights(&self) -> &[u32; BOARD_WIDTH] {
        self.column_heights.get_or_init(|| {
            let mut column_heights = [0; BOARD_WIDTH];
            for (x, h) in column_heights.iter_mut().enumerate() {
                let top = self.board.rows().position(|row| row.is_cell_occupied(x));
                if let Some(top) = top {
                    *h = cell_count(BOARD_HEIGHT - top);
                }
            }
            column_heights
        })
    }

    #[must_use]
    pub fn column_occupied_cells(&self) -> &[u32; BOARD_WIDTH] {
        self.column_occupied_cells.get_or_init(|| {
            let mut column_occupied_cells = [0; BOARD_WIDTH];
            for row in self.board.rows() {
                for (x, o) in column_occupied_cells.iter_mut().enumerate() {
                    if row.is_cell_occupied(x) {
                        *o += 1;
                    }
                }
            }
            column_occupied_cells
        })
    }

    #[must_use]
    pub fn max_height(&self) -> u32 {
        *self
            .max_height
            .get_or_init(|| self.column_heights().iter().copied().max().unwrap_or(0))
    }

    #[must_use]
    pub fn total_height(&self) -> u32 {
        *self
            .total_height
            .get_or_init(|| self.column_heights().iter().sum())
    }

    /// Empty cells with at least one occupied cell above them in the same column.
    #[must_use]
    pub fn num_holes(&self) -> u32 {
        *self.num_holes.get_or_init(|| {
            iter::zip(self.column_heights(), self.column_occupied_cells())
                .map(|(h, occ)| h - occ)
                .sum()
        })
    }

    /// Sum of absolute height differences between adjacent columns.
    #[must_use]
    pub fn bumpiness(&self) -> u32 {
        *self.bumpiness.get_or_init(|| {
            self.column_heights()
                .windows(2)
                .map(|w| w[0].abs_diff(w[1]))
                .sum()
        })
    }

    #[must_use]
    pub fn metrics(&self) -> BoardMetrics {
        BoardMetrics {
            total_height: self.total_height(),
            max_height: self.max_height(),
            bumpiness: self.bumpiness(),
            holes: self.num_holes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board() {
        let analysis = BoardAnalysis::from_board(&Board::EMPTY);
        assert_eq!(analysis.column_heights(), &[0; BOARD_WIDTH]);
        assert_eq!(analysis.metrics(), BoardMetrics::default());
    }

    #[test]
    fn test_column_heights_and_bumpiness() {
        let board = Board::from_ascii(
            "
            #.........
            #.........
            ##......#.
            ###.....##
            ",
        )
        .unwrap();
        let analysis = BoardAnalysis::from_board(&board);
        assert_eq!(analysis.column_heights(), &[4, 2, 1, 0, 0, 0, 0, 0, 2, 1]);
        assert_eq!(analysis.total_height(), 10);
        assert_eq!(analysis.max_height(), 4);
        // 2 + 1 + 1 + 0 + 0 + 0 + 0 + 2 + 1
        assert_eq!(analysis.bumpiness(), 7);
        assert_eq!(analysis.num_holes(), 0);
    }

    #[test]
    fn test_holes_count_every_covered_gap() {
        let board = Board::from_ascii(
            "
            .#........
            ..........
            .#...#....
            .#.......#
            ##.......#
            ",
        )
        .unwrap();
        let analysis = BoardAnalysis::from_board(&board);
        // column 1: one gap under the top cell; column 5: two cells under it
        assert_eq!(analysis.num_holes(), 3);
        assert_eq!(analysis.column_heights()[1], 5);
        assert_eq!(analysis.column_occupied_cells()[1], 4);
    }
}
