use serde::{Deserialize, Serialize};

/// Points per lock, indexed by the number of rows cleared at once.
///
/// The awarded points are multiplied by the level at the time of the lock.
const SCORE_FACTORS: [usize; 5] = [0, 40, 100, 300, 1200];

/// Rows needed to advance one level.
const LINES_PER_LEVEL: usize = 10;

/// Statistics of a single round (from reset to top-out).
///
/// # Example
///
/// ```
/// use greedris_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_piece_drop(4);
///
/// assert_eq!(stats.score(), 1200);
/// assert_eq!(stats.total_cleared_lines(), 4);
/// assert_eq!(stats.level(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    score: usize,
    completed_pieces: usize,
    total_cleared_lines: usize,
    line_cleared_counter: [usize; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            completed_pieces: 0,
            total_cleared_lines: 0,
            line_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    /// Current level, starting at 1 and increasing every 10 cleared rows.
    #[must_use]
    pub const fn level(&self) -> usize {
        self.total_cleared_lines / LINES_PER_LEVEL + 1
    }

    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Histogram of locks by rows cleared (`[0]` = no clear, `[4]` = four rows).
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Gravity interval in milliseconds for the current level.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn fall_interval_ms(&self) -> f64 {
        500.0 / (1.0 + (self.level() - 1) as f64 * 0.2)
    }

    /// Updates the statistics after a piece has been locked.
    pub fn complete_piece_drop(&mut self, cleared_lines: usize) {
        let factor = SCORE_FACTORS
            .get(cleared_lines)
            .copied()
            .unwrap_or(SCORE_FACTORS[SCORE_FACTORS.len() - 1]);
        self.score += factor * self.level();
        self.completed_pieces += 1;
        self.total_cleared_lines += cleared_lines;
        if let Some(counter) = self.line_cleared_counter.get_mut(cleared_lines) {
            *counter += 1;
        }
    }
}

/// Best results across all rounds of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecords {
    pub rounds: usize,
    pub level: usize,
    pub lines: usize,
    pub score: usize,
}

impl SessionRecords {
    /// Folds a finished round into the records.
    pub fn record_round(&mut self, stats: &GameStats) {
        self.rounds += 1;
        self.level = self.level.max(stats.level());
        self.lines = self.lines.max(stats.total_cleared_lines());
        self.score = self.score.max(stats.score());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_uses_level_before_the_clear() {
        let mut stats = GameStats::new();
        for _ in 0..9 {
            stats.complete_piece_drop(1);
        }
        assert_eq!(stats.score(), 9 * 40);
        assert_eq!(stats.level(), 1);

        // the 10th row is still scored at level 1
        stats.complete_piece_drop(1);
        assert_eq!(stats.score(), 10 * 40);
        assert_eq!(stats.level(), 2);

        stats.complete_piece_drop(2);
        assert_eq!(stats.score(), 10 * 40 + 2 * 100);
    }

    #[test]
    fn test_line_cleared_counter() {
        let mut stats = GameStats::new();
        stats.complete_piece_drop(0);
        stats.complete_piece_drop(0);
        stats.complete_piece_drop(3);
        assert_eq!(stats.line_cleared_counter(), &[2, 0, 0, 1, 0]);
        assert_eq!(stats.completed_pieces(), 3);
    }

    #[test]
    fn test_fall_interval_speeds_up() {
        let mut stats = GameStats::new();
        assert!((stats.fall_interval_ms() - 500.0).abs() < f64::EPSILON);
        for _ in 0..10 {
            stats.complete_piece_drop(1);
        }
        assert!((stats.fall_interval_ms() - 500.0 / 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_records_keep_the_best_round() {
        let mut records = SessionRecords::default();

        let mut good = GameStats::new();
        good.complete_piece_drop(4);
        records.record_round(&good);

        let mut poor = GameStats::new();
        poor.complete_piece_drop(1);
        records.record_round(&poor);

        assert_eq!(records.rounds, 2);
        assert_eq!(records.score, 1200);
        assert_eq!(records.lines, 4);
        assert_eq!(records.level, 1);
    }
}
