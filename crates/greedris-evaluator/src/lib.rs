//! Greedy placement search for falling-block games.
//!
//! The crate is layered the same way the search runs, leaf first:
//!
//! 1. **Board analysis** ([`board_analysis`]) - Lazily computed column metrics of a
//!    board (heights, holes, bumpiness).
//! 2. **Placement analysis** ([`placement_analysis`]) - The board as it would look
//!    after locking a piece and clearing full rows.
//! 3. **Placement evaluation** ([`placement_evaluator`]) - A scalar cost for a
//!    placement analysis. Lower is better.
//! 4. **Placement search** ([`placement_search`]) - Enumerates every rotation and
//!    horizontal offset, drops each candidate and keeps the cheapest.
//!
//! On top of that, [`reward`] computes the play-time reward of a turn and
//! [`autoplay`] drives a [`GameSession`](greedris_engine::GameSession) with the
//! search.
//!
//! # Example
//!
//! ```
//! use greedris_engine::{Board, Piece, ShapeKind};
//! use greedris_evaluator::placement_search::best_placement;
//!
//! let board = Board::EMPTY;
//! let placement = best_placement(&board, &Piece::spawn(ShapeKind::O));
//! assert_eq!(placement.rotation, 0);
//! ```
//!
//! # Limitations
//!
//! - Only the falling piece is considered; the preview queue is not searched.
//! - Candidates are dropped straight down from the spawn row. Placements that need
//!   a slide under an overhang are never generated.

pub mod autoplay;
pub mod board_analysis;
pub mod placement_analysis;
pub mod placement_evaluator;
pub mod placement_search;
pub mod reward;
