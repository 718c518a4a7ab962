//! Board and piece model for a greedy falling-block placement bot.
//!
//! - [`core`] holds the data every placement is evaluated against: the locked
//!   [`Board`], the read-only shape catalog ([`ShapeKind`], [`Shape`]) and the
//!   mutable [`Piece`] placement.
//! - [`engine`] drives play: the [`ShapeBag`] randomizer and the headless
//!   [`GameSession`].

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("piece colliding with the board or walls")]
pub struct PieceCollisionError;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("unknown shape {input:?}, expected one of T, L, J, O, S, Z, I")]
pub struct ShapeParseError {
    input: String,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum BoardParseError {
    #[display("board has {rows} rows, at most {max} allowed")]
    TooManyRows { rows: usize, max: usize },
    #[display("row {row} has {width} cells, expected {expected}")]
    RowWidth {
        row: usize,
        width: usize,
        expected: usize,
    },
    #[display("row {row} has invalid cell {ch:?}")]
    InvalidCell { row: usize, ch: char },
}

/// Rejected manual input on a [`GameSession`].
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum MoveError {
    #[display("{_0}")]
    Collision(PieceCollisionError),
    #[display("session is paused")]
    Paused,
}

impl From<PieceCollisionError> for MoveError {
    fn from(err: PieceCollisionError) -> Self {
        MoveError::Collision(err)
    }
}
