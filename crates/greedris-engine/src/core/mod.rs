pub use self::{board::*, piece::*, placement::*};

pub(crate) mod board;
pub(crate) mod piece;
pub(crate) mod placement;

/// Number of columns on the board.
pub const BOARD_WIDTH: usize = 10;
/// Number of rows on the board.
pub const BOARD_HEIGHT: usize = 20;
