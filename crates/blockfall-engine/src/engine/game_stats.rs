/// Base score for clearing 1, 2, 3 or 4 rows in a single pass.
///
/// Index 0 is unused. Passes clearing more than 4 rows score as 4.
const SCORE_TABLE: [usize; 5] = [0, 40, 100, 300, 1000];

/// Frames per second of the reference speed table.
const FRAMES_PER_SECOND: usize = 60;

/// Milliseconds per tick at level 0.
pub const INITIAL_MS_PER_TICK: usize = ms_per_tick(0);

/// Returns the base score of a pass clearing `rows` rows.
#[must_use]
pub const fn score_for_clear(rows: usize) -> usize {
    if rows >= 4 {
        SCORE_TABLE[4]
    } else {
        SCORE_TABLE[rows]
    }
}

/// Returns the number of frames (at 60 fps) a piece stays on a row at `level`.
#[must_use]
pub const fn frames_per_tick(level: usize) -> usize {
    match level {
        0..=8 => 48 - level * 5,
        9 => 6,
        10..=18 => 4,
        19..=28 => 2,
        _ => 1,
    }
}

/// Returns the tick interval in whole milliseconds at `level`.
///
/// | level | ms  |
/// |-------|-----|
/// | 0     | 800 |
/// | 1     | 716 |
/// | 8     | 133 |
/// | 9     | 100 |
/// | 10–18 | 66  |
/// | 19–28 | 33  |
/// | 29+   | 16  |
#[must_use]
pub const fn ms_per_tick(level: usize) -> usize {
    frames_per_tick(level) * 1000 / FRAMES_PER_SECOND
}

/// Score, cleared rows, level and speed of a game.
///
/// - **Score**: sum of `score_for_clear(rows) * (level + 1)` over every
///   clearing pass, using the level in effect before the pass
/// - **Level**: one level per 10 cleared rows
/// - **Speed**: tick interval derived from the level
///
/// All counters only grow.
///
/// # Example
///
/// ```
/// use blockfall_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.record_clear(4);
///
/// assert_eq!(stats.score(), 1000);
/// assert_eq!(stats.cleared_lines(), 4);
/// assert_eq!(stats.level(), 0);
/// assert_eq!(stats.ms_per_tick(), 800);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct GameStats {
    score: usize,
    cleared_lines: usize,
    level: usize,
    ms_per_tick: usize,
    locked_pieces: usize,
    clear_counter: [usize; 5],
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
            cleared_lines: 0,
            level: 0,
            ms_per_tick: INITIAL_MS_PER_TICK,
            locked_pieces: 0,
            clear_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub const fn cleared_lines(&self) -> usize {
        self.cleared_lines
    }

    #[must_use]
    pub const fn level(&self) -> usize {
        self.level
    }

    #[must_use]
    pub const fn ms_per_tick(&self) -> usize {
        self.ms_per_tick
    }

    /// Number of pieces merged into the settled cells.
    #[must_use]
    pub const fn locked_pieces(&self) -> usize {
        self.locked_pieces
    }

    /// Histogram of clearing passes by row count.
    ///
    /// - `[0]`: locks that cleared nothing
    /// - `[1]`..`[4]`: passes clearing 1 to 4 rows (larger passes count as 4)
    #[must_use]
    pub const fn clear_counter(&self) -> &[usize; 5] {
        &self.clear_counter
    }

    /// Records a piece lock. `cleared` is the total rows cleared by its cascade.
    pub fn record_lock(&mut self, cleared: usize) {
        self.locked_pieces += 1;
        if cleared == 0 {
            self.clear_counter[0] += 1;
        }
    }

    /// Records one clearing pass of `rows` rows.
    ///
    /// The score uses the current level; the level and speed are refreshed
    /// afterwards.
    pub fn record_clear(&mut self, rows: usize) {
        if rows == 0 {
            return;
        }
        self.clear_counter[rows.min(4)] += 1;
        self.cleared_lines += rows;
        self.score += score_for_clear(rows) * (self.level + 1);
        self.level = self.cleared_lines / 10;
        self.ms_per_tick = ms_per_tick(self.level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_table() {
        let expected = [
            (0, 800),
            (1, 716),
            (2, 633),
            (3, 550),
            (4, 466),
            (5, 383),
            (6, 300),
            (7, 216),
            (8, 133),
            (9, 100),
            (10, 66),
            (18, 66),
            (19, 33),
            (28, 33),
            (29, 16),
            (1000, 16),
        ];
        for (level, ms) in expected {
            assert_eq!(ms_per_tick(level), ms, "level {level}");
        }
    }

    #[test]
    fn test_score_table() {
        assert_eq!(score_for_clear(0), 0);
        assert_eq!(score_for_clear(1), 40);
        assert_eq!(score_for_clear(2), 100);
        assert_eq!(score_for_clear(3), 300);
        assert_eq!(score_for_clear(4), 1000);
        assert_eq!(score_for_clear(6), 1000);
    }

    #[test]
    fn test_score_uses_level_before_pass() {
        let mut stats = GameStats::new();
        for _ in 0..9 {
            stats.record_clear(1);
        }
        assert_eq!(stats.score(), 9 * 40);
        assert_eq!(stats.level(), 0);

        // Crosses into level 1, still scored at level 0
        stats.record_clear(2);
        assert_eq!(stats.score(), 9 * 40 + 100);
        assert_eq!(stats.cleared_lines(), 11);
        assert_eq!(stats.level(), 1);
        assert_eq!(stats.ms_per_tick(), 716);

        // Scored at level 1
        stats.record_clear(3);
        assert_eq!(stats.score(), 9 * 40 + 100 + 300 * 2);
    }

    #[test]
    fn test_counters() {
        let mut stats = GameStats::new();
        stats.record_lock(0);
        stats.record_clear(1);
        stats.record_lock(1);
        stats.record_clear(5);
        stats.record_lock(5);

        assert_eq!(stats.locked_pieces(), 3);
        assert_eq!(stats.clear_counter(), &[1, 1, 0, 0, 1]);
        assert_eq!(stats.score(), 40 + 1000);
    }

    #[test]
    fn test_zero_row_clear_is_ignored() {
        let mut stats = GameStats::new();
        stats.record_clear(0);
        assert_eq!(stats, GameStats::new());
    }
}
