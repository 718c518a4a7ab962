//! Placement evaluation: a scalar cost for a single placement.
//!
//! The cost is computed from the board after the piece is locked and full rows
//! are cleared. Lower is better.
//!
//! # Heuristic
//!
//! [`HeuristicEvaluator`] combines three column metrics linearly:
//!
//! ```text
//! cost = 1 × total_height + 2 × bumpiness + 20 × holes
//! ```
//!
//! Holes are nearly unrecoverable until the rows above them are cleared, so they
//! dominate. Bumpiness keeps the surface flat and raw height keeps the stack low.
//! The coefficients are hand-tuned; [`CostWeights`] lets them be overridden, and
//! the defaults are the coefficients above.
//!
//! # Usage
//!
//! ```
//! use greedris_engine::{Board, Piece, ShapeKind};
//! use greedris_evaluator::{
//!     placement_analysis::PlacementAnalysis,
//!     placement_evaluator::{HeuristicEvaluator, PlacementEvaluator},
//! };
//!
//! let board = Board::EMPTY;
//! let resting = Piece::spawn(ShapeKind::I).simulate_drop_position(&board);
//! let analysis = PlacementAnalysis::from_board(&board, resting);
//!
//! // four columns of height 1 with a step at each end
//! assert_eq!(HeuristicEvaluator::default().evaluate_cost(&analysis), 4 + 2 * 2);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{board_analysis::BoardAnalysis, placement_analysis::PlacementAnalysis};

/// Evaluates piece placements by assigning costs.
pub trait PlacementEvaluator: fmt::Debug + Send + Sync {
    /// Returns the cost of a placement (lower is better).
    fn evaluate_cost(&self, analysis: &PlacementAnalysis) -> u32;
}

/// Coefficients of the heuristic cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CostWeights {
    pub height: u32,
    pub bumpiness: u32,
    pub holes: u32,
}

impl Default for CostWeights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl CostWeights {
    pub const DEFAULT: Self = Self {
        height: 1,
        bumpiness: 2,
        holes: 20,
    };

    /// Weighted cost of a board.
    #[must_use]
    pub fn cost(&self, board: &BoardAnalysis) -> u32 {
        let height = self.height.saturating_mul(board.total_height());
        let bumpiness = self.bumpiness.saturating_mul(board.bumpiness());
        let holes = self.holes.saturating_mul(board.num_holes());
        height.saturating_add(bumpiness).saturating_add(holes)
    }
}

/// Linear height/bumpiness/holes cost.
#[derive(Debug, Clone, Default)]
pub struct HeuristicEvaluator {
    weights: CostWeights,
}

impl HeuristicEvaluator {
    #[must_use]
    pub fn new(weights: CostWeights) -> Self {
        Self { weights }
    }

    #[must_use]
    pub fn weights(&self) -> &CostWeights {
        &self.weights
    }
}

impl PlacementEvaluator for HeuristicEvaluator {
    #[inline]
    fn evaluate_cost(&self, analysis: &PlacementAnalysis) -> u32 {
        self.weights.cost(analysis.board_analysis())
    }
}

#[cfg(test)]
mod tests {
    use greedris_engine::Board;

    use super::*;

    fn cost_of(art: &str) -> u32 {
        let board = Board::from_ascii(art).unwrap();
        CostWeights::DEFAULT.cost(&BoardAnalysis::from_board(&board))
    }

    #[test]
    fn test_empty_board_costs_nothing() {
        assert_eq!(cost_of(""), 0);
    }

    #[test]
    fn test_hole_costs_twenty() {
        let flat = cost_of(
            "
            ##########
            ##########
            ",
        );
        let holed = cost_of(
            "
            ##########
            ####.#####
            ",
        );
        assert_eq!(flat, 20);
        assert_eq!(holed, flat + 20);
    }

    #[test]
    fn test_height_step_costs_two_per_unit() {
        let flat = cost_of("##########");
        let stepped = cost_of(
            "
            #.........
            ##########
            ",
        );
        // one more cell of height, one more unit of bumpiness
        assert_eq!(stepped, flat + 1 + 2);
    }

    #[test]
    fn test_weights_deserialize_with_defaults() {
        let weights: CostWeights = serde_json::from_str(r#"{"holes": 50}"#).unwrap();
        assert_eq!(
            weights,
            CostWeights {
                holes: 50,
                ..CostWeights::DEFAULT
            }
        );
        assert!(serde_json::from_str::<CostWeights>(r#"{"wells": 1}"#).is_err());
    }
}
