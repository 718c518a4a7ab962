//! Play-time reward of a single turn.
//!
//! This is a different signal from the search cost in
//! [`placement_evaluator`](crate::placement_evaluator):
//!
//! ```text
//! reward = 3 + lines² × BOARD_WIDTH − Δtotal_height − Δbumpiness − 20 × Δholes
//! ```
//!
//! The bumpiness delta is not doubled here although the search cost doubles
//! bumpiness. Both formulas are kept as they are and neither is derived from the
//! other.

use greedris_engine::BOARD_WIDTH;

use crate::board_analysis::BoardMetrics;

/// Constant reward for surviving a turn.
const SURVIVAL_REWARD: i64 = 3;
const HOLE_PENALTY: i64 = 20;

/// Reward for a turn that turned `before` into `after` by clearing
/// `cleared_lines` rows.
///
/// # Example
///
/// ```
/// use greedris_evaluator::{board_analysis::BoardMetrics, reward::turn_reward};
///
/// let before = BoardMetrics::default();
/// let after = BoardMetrics {
///     total_height: 4,
///     max_height: 1,
///     bumpiness: 2,
///     holes: 0,
/// };
/// assert_eq!(turn_reward(&before, &after, 0), 3 - 4 - 2);
/// ```
#[must_use]
pub fn turn_reward(before: &BoardMetrics, after: &BoardMetrics, cleared_lines: usize) -> i64 {
    let delta = |before: u32, after: u32| i64::from(after) - i64::from(before);
    let lines = i64::try_from(cleared_lines).unwrap_or(i64::MAX);
    let width = i64::try_from(BOARD_WIDTH).unwrap_or(i64::MAX);

    SURVIVAL_REWARD + lines.saturating_mul(lines).saturating_mul(width)
        - delta(before.total_height, after.total_height)
        - delta(before.bumpiness, after.bumpiness)
        - HOLE_PENALTY * delta(before.holes, after.holes)
}
