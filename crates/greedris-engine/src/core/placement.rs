use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use super::BOARD_WIDTH;

/// Final resting choice for a falling piece: how many times to rotate it from
/// rotation 0, and the horizontal offset to shift it to before hard-dropping.
///
/// `offset` uses the same convention as [`Piece::x`](super::Piece::x): the
/// column of the left edge of the shape's 4×4 bounding square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    pub rotation: usize,
    pub offset: i32,
}

impl Placement {
    #[must_use]
    pub const fn new(rotation: usize, offset: i32) -> Self {
        Self { rotation, offset }
    }
}

/// A single driver input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Input {
    RotateCw,
    Left,
    Right,
    HardDrop,
}

/// Maximum inputs in a plan: 3 rotations, a full-width shift, one hard drop.
const MAX_INPUTS: usize = 3 + BOARD_WIDTH + 1;

/// Ordered inputs that carry out a [`Placement`] from the spawn offset.
///
/// Rotations come first, then horizontal moves, then a single hard drop.
///
/// # Example
///
/// ```
/// use greedris_engine::{Input, MovePlan, Piece, Placement};
///
/// let plan = MovePlan::from_placement(Piece::SPAWN_X, Placement::new(1, 1));
/// assert_eq!(
///     plan.inputs(),
///     [Input::RotateCw, Input::Left, Input::Left, Input::HardDrop]
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovePlan {
    inputs: ArrayVec<Input, MAX_INPUTS>,
}

impl MovePlan {
    #[must_use]
    pub fn from_placement(spawn_offset: i32, placement: Placement) -> Self {
        let mut inputs = ArrayVec::new();
        for _ in 0..placement.rotation.min(3) {
            inputs.push(Input::RotateCw);
        }
        let movement = placement.offset - spawn_offset;
        let key = if movement < 0 {
            Input::Left
        } else {
            Input::Right
        };
        let steps = usize::try_from(movement.unsigned_abs()).unwrap_or(usize::MAX);
        for _ in 0..steps.min(BOARD_WIDTH) {
            inputs.push(key);
        }
        inputs.push(Input::HardDrop);
        Self { inputs }
    }

    #[must_use]
    pub fn inputs(&self) -> &[Input] {
        &self.inputs
    }
}
