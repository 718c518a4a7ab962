use std::{collections::VecDeque, time::Duration};

use serde::Serialize;

use crate::{
    MoveError, PieceCollisionError,
    core::{board::Board, piece::Piece, placement::Placement},
};

use super::{GameStats, SessionRecords, ShapeBag};

/// Number of upcoming pieces visible in the preview queue.
pub const PREVIEW_LEN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::IsVariant)]
pub enum SessionState {
    Playing,
    Paused,
}

/// Result of locking the falling piece into the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LockOutcome {
    /// The piece as it was locked.
    pub piece: Piece,
    pub cleared_lines: usize,
    /// The next piece did not fit at spawn; the round ended and the session was
    /// reset.
    pub topped_out: bool,
}

/// Headless game state: the locked board, the falling piece, a preview queue
/// and the statistics of the current round.
///
/// A topped-out round never leaves the session in a terminal state. The round
/// is folded into [`SessionRecords`] and a fresh round starts immediately, so
/// drivers can keep stepping across rounds.
///
/// # Example
///
/// ```
/// use greedris_engine::{GameSession, Placement};
///
/// let mut session = GameSession::new();
/// let outcome = session.step(Placement::new(0, 0)).unwrap();
/// assert_eq!(session.stats().completed_pieces(), 1);
/// assert!(!outcome.topped_out);
/// ```
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    falling_piece: Piece,
    preview: VecDeque<Piece>,
    bag: ShapeBag,
    stats: GameStats,
    records: SessionRecords,
    state: SessionState,
    fall_elapsed_ms: f64,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    #[must_use]
    pub fn new() -> Self {
        Self::with_bag(ShapeBag::new())
    }

    /// Creates a session drawing its pieces from `bag`.
    ///
    /// Use [`ShapeBag::with_seed`] for a reproducible piece sequence.
    #[must_use]
    pub fn with_bag(mut bag: ShapeBag) -> Self {
        let falling_piece = Self::first_piece(&mut bag);
        let preview = (0..PREVIEW_LEN)
            .map(|_| Piece::spawn(bag.pop_next()))
            .collect();
        Self {
            board: Board::EMPTY,
            falling_piece,
            preview,
            bag,
            stats: GameStats::new(),
            records: SessionRecords::default(),
            state: SessionState::Playing,
            fall_elapsed_ms: 0.0,
        }
    }

    fn first_piece(bag: &mut ShapeBag) -> Piece {
        Piece::new(bag.pop_next(), Piece::SPAWN_X, Piece::FIRST_SPAWN_Y)
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn falling_piece(&self) -> &Piece {
        &self.falling_piece
    }

    /// Upcoming pieces, next first.
    pub fn next_pieces(&self) -> impl ExactSizeIterator<Item = &Piece> {
        self.preview.iter()
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn records(&self) -> &SessionRecords {
        &self.records
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn toggle_pause(&mut self) {
        self.state = match self.state {
            SessionState::Playing => SessionState::Paused,
            SessionState::Paused => SessionState::Playing,
        };
    }

    fn ensure_playing(&self) -> Result<(), MoveError> {
        if self.state.is_paused() {
            return Err(MoveError::Paused);
        }
        Ok(())
    }

    fn try_set_falling_piece(&mut self, piece: Piece) -> Result<(), MoveError> {
        self.ensure_playing()?;
        if !self.board.is_valid(&piece) {
            return Err(PieceCollisionError.into());
        }
        self.falling_piece = piece;
        Ok(())
    }

    pub fn try_move_left(&mut self) -> Result<(), MoveError> {
        self.try_set_falling_piece(self.falling_piece.left())
    }

    pub fn try_move_right(&mut self) -> Result<(), MoveError> {
        self.try_set_falling_piece(self.falling_piece.right())
    }

    pub fn try_soft_drop(&mut self) -> Result<(), MoveError> {
        self.try_set_falling_piece(self.falling_piece.down())
    }

    /// Rotates the falling piece clockwise in place; there are no wall kicks.
    pub fn try_rotate(&mut self) -> Result<(), MoveError> {
        let mut piece = self.falling_piece;
        piece.rotate();
        self.try_set_falling_piece(piece)
    }

    /// Drops the falling piece to its resting position and locks it.
    pub fn hard_drop(&mut self) -> Result<LockOutcome, MoveError> {
        self.ensure_playing()?;
        self.falling_piece = self.falling_piece.simulate_drop_position(&self.board);
        Ok(self.lock_falling_piece())
    }

    /// Advances gravity by `elapsed` wall-clock time.
    ///
    /// Once the accumulated time exceeds the fall interval of the current level,
    /// the piece moves down one row, or is locked if it cannot. Returns the lock
    /// outcome when a lock happened. Paused sessions ignore time.
    pub fn tick(&mut self, elapsed: Duration) -> Option<LockOutcome> {
        if self.state.is_paused() {
            return None;
        }
        self.fall_elapsed_ms += elapsed.as_secs_f64() * 1000.0;
        if self.fall_elapsed_ms <= self.stats.fall_interval_ms() {
            return None;
        }
        self.fall_elapsed_ms = 0.0;
        if self.try_soft_drop().is_ok() {
            return None;
        }
        Some(self.lock_falling_piece())
    }

    /// Carries out `placement` with the manual primitives and locks the piece.
    ///
    /// Rotations and shifts that would collide are skipped, so the piece lands
    /// as close to the requested placement as the board allows.
    pub fn step(&mut self, placement: Placement) -> Result<LockOutcome, MoveError> {
        self.ensure_playing()?;
        for _ in 0..placement.rotation {
            if self.try_rotate().is_err() {
                break;
            }
        }
        while self.falling_piece.x() != placement.offset {
            let moved = if self.falling_piece.x() < placement.offset {
                self.try_move_right()
            } else {
                self.try_move_left()
            };
            if moved.is_err() {
                break;
            }
        }
        self.hard_drop()
    }

    fn lock_falling_piece(&mut self) -> LockOutcome {
        let piece = self.falling_piece;
        self.board.lock(&piece, piece.kind());
        let cleared_lines = self.board.clear_full_rows();
        self.stats.complete_piece_drop(cleared_lines);
        self.fall_elapsed_ms = 0.0;

        self.falling_piece = self.pop_preview();
        let topped_out = !self.board.is_valid(&self.falling_piece);
        if topped_out {
            self.records.record_round(&self.stats);
            tracing::info!(
                round = self.records.rounds,
                score = self.stats.score(),
                lines = self.stats.total_cleared_lines(),
                level = self.stats.level(),
                best_score = self.records.score,
                "game over, restarting"
            );
            self.restart_round();
        }

        LockOutcome {
            piece,
            cleared_lines,
            topped_out,
        }
    }

    fn pop_preview(&mut self) -> Piece {
        self.preview.push_back(Piece::spawn(self.bag.pop_next()));
        match self.preview.pop_front() {
            Some(piece) => piece,
            None => Piece::spawn(self.bag.pop_next()),
        }
    }

    fn restart_round(&mut self) {
        self.board = Board::EMPTY;
        self.stats = GameStats::new();
        self.falling_piece = Self::first_piece(&mut self.bag);
        self.fall_elapsed_ms = 0.0;
    }
}
