//! Headless play: a [`GameSession`] driven by a [`PlacementSearch`].
//!
//! Each turn searches the live board for the falling piece, hands the winning
//! placement to [`GameSession::step`] and scores the turn with
//! [`turn_reward`](crate::reward::turn_reward). Sessions restart on their own
//! after a top-out, so a run is bounded by a piece count and optionally by a
//! number of finished rounds.

use greedris_engine::{GameSession, GameStats, LockOutcome, MoveError, Placement, SessionRecords};
use serde::Serialize;

use crate::{
    board_analysis::BoardAnalysis, placement_analysis::PlacementAnalysis,
    placement_search::PlacementSearch, reward::turn_reward,
};

const PROGRESS_INTERVAL: usize = 500;

/// What happened in one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TurnOutcome {
    /// The placement the search chose.
    pub placement: Placement,
    /// Search cost of the chosen placement.
    pub cost: u32,
    pub lock: LockOutcome,
    pub reward: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoplayLimits {
    pub max_pieces: usize,
    /// Stop once this many rounds have topped out.
    pub max_rounds: Option<usize>,
}

/// Totals of an autoplay run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AutoplayReport {
    pub pieces: usize,
    pub total_reward: i64,
    pub total_cleared_lines: usize,
    /// Locks by rows cleared at once, across all rounds.
    pub line_cleared_counter: [usize; 5],
    /// Best results of the rounds that topped out.
    pub records: SessionRecords,
    /// The round still in progress when the run stopped.
    pub current_round: GameStats,
}

/// Plays a single turn.
///
/// # Errors
///
/// Returns [`MoveError::Paused`] if the session is paused.
pub fn play_turn(
    search: &PlacementSearch<'_>,
    session: &mut GameSession,
) -> Result<TurnOutcome, MoveError> {
    let before_board = session.board().clone();
    let before = BoardAnalysis::from_board(&before_board).metrics();
    let result = search.search(&before_board, session.falling_piece());

    let lock = session.step(result.placement)?;
    // the session may already have reset after a top-out, so rebuild the
    // post-lock board from the piece that was actually locked
    let after = PlacementAnalysis::from_board(&before_board, lock.piece);
    let reward = turn_reward(
        &before,
        &after.board_analysis().metrics(),
        lock.cleared_lines,
    );

    Ok(TurnOutcome {
        placement: result.placement,
        cost: result.cost,
        lock,
        reward,
    })
}

/// Plays turns until one of `limits` is reached.
///
/// # Errors
///
/// Returns [`MoveError::Paused`] if the session is paused.
pub fn play_session(
    search: &PlacementSearch<'_>,
    session: &mut GameSession,
    limits: AutoplayLimits,
) -> Result<AutoplayReport, MoveError> {
    let mut report = AutoplayReport::default();
    let rounds_done =
        |session: &GameSession| limits.max_rounds.is_some_and(|max| session.records().rounds >= max);

    while report.pieces < limits.max_pieces && !rounds_done(session) {
        let turn = play_turn(search, session)?;
        report.pieces += 1;
        report.total_reward += turn.reward;
        report.total_cleared_lines += turn.lock.cleared_lines;
        let bucket = turn.lock.cleared_lines.min(report.line_cleared_counter.len() - 1);
        report.line_cleared_counter[bucket] += 1;

        if report.pieces % PROGRESS_INTERVAL == 0 {
            tracing::info!(
                pieces = report.pieces,
                lines = report.total_cleared_lines,
                rounds = session.records().rounds,
                score = session.stats().score(),
                "autoplay progress"
            );
        }
    }

    report.records = session.records().clone();
    report.current_round = session.stats().clone();
    Ok(report)
}

#[cfg(test)]
mod tests {
    use greedris_engine::{Board, PieceSeed, ShapeBag};

    use super::*;

    fn seeded_session() -> GameSession {
        let seed: PieceSeed = "c0ffee00c0ffee00c0ffee00c0ffee00".parse().unwrap();
        GameSession::with_bag(ShapeBag::with_seed(seed))
    }

    #[test]
    fn test_turn_lands_where_the_search_chose() {
        let search = PlacementSearch::default();
        let mut session = seeded_session();
        let expected = search.search(session.board(), session.falling_piece());

        let turn = play_turn(&search, &mut session).unwrap();
        assert_eq!(turn.placement, expected.placement);
        assert_eq!(turn.lock.piece, expected.resting);
        assert_eq!(turn.cost, expected.cost);
    }

    #[test]
    fn test_first_turn_reward() {
        let search = PlacementSearch::default();
        let mut session = seeded_session();
        let turn = play_turn(&search, &mut session).unwrap();

        let after = PlacementAnalysis::from_board(&Board::EMPTY, turn.lock.piece);
        let metrics = after.board_analysis().metrics();
        let expected = 3
            - i64::from(metrics.total_height)
            - i64::from(metrics.bumpiness)
            - 20 * i64::from(metrics.holes);
        assert_eq!(turn.reward, expected);
    }

    #[test]
    fn test_session_respects_the_piece_limit() {
        let search = PlacementSearch::default();
        let mut session = seeded_session();
        let limits = AutoplayLimits {
            max_pieces: 120,
            max_rounds: None,
        };
        let report = play_session(&search, &mut session, limits).unwrap();
        assert_eq!(report.pieces, 120);
        assert_eq!(report.line_cleared_counter.iter().sum::<usize>(), 120);
        // the greedy search clears rows steadily on an open board
        assert!(report.total_cleared_lines > 0);
    }

    #[test]
    fn test_paused_session_is_rejected() {
        let search = PlacementSearch::default();
        let mut session = seeded_session();
        session.toggle_pause();
        assert!(matches!(
            play_turn(&search, &mut session),
            Err(MoveError::Paused)
        ));
    }
}
