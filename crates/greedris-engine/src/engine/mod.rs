//! Game state built on top of [`core`](crate::core).
//!
//! - [`ShapeBag`] - 7-bag shape randomizer with a [`PieceSeed`] for reproducible runs
//! - [`GameStats`] - Score, level and cleared lines of one round
//! - [`SessionRecords`] - Best results across rounds
//! - [`GameSession`] - Headless game: falling piece, preview queue, gravity and locking
//!
//! # Game Flow
//!
//! 1. The session spawns the first piece above the board and fills the preview
//! 2. A driver moves the piece with the manual primitives, or hands a
//!    [`Placement`](crate::Placement) to [`GameSession::step`]
//! 3. The piece locks, full rows are cleared and the next preview piece spawns
//! 4. If that piece does not fit, the round is recorded and a new one starts

pub use self::{game_session::*, game_stats::*, shape_bag::*};

mod game_session;
mod game_stats;
mod shape_bag;
