use std::{collections::BTreeSet, fmt};

use serde::Serialize;
use tracing::{debug, info};

use crate::{
    MoveError,
    core::{BOARD_HEIGHT, BOARD_WIDTH, Cell, Piece, PieceKind, Position, SettledCells},
};

use super::{
    board_config::BoardConfig,
    game_stats::GameStats,
    piece_source::{PieceSource, RandomPieceSource},
};

/// Result of a [`Board::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum TickOutcome {
    /// The piece moved down one row.
    Moved,
    /// The piece landed, merged into the settled cells and the next piece
    /// spawned. `cleared_lines` counts every row removed by the cascade.
    Locked { cleared_lines: usize },
    /// The piece landed on the top row, or the next piece spawned on top of
    /// settled cells. The board is frozen from now on.
    GameOver,
    /// The game was already over; nothing happened.
    Ignored,
}

/// One game: the settled cells, the falling piece, and the statistics.
///
/// The board is driven by four commands: [`move_left`](Self::move_left),
/// [`move_right`](Self::move_right), [`rotate`](Self::rotate) and
/// [`tick`](Self::tick). Illegal commands are ignored. The `try_*` variants
/// report why a command was rejected instead.
///
/// # Game Flow
///
/// 1. A piece spawns at the top of the board
/// 2. The driver moves/rotates it and calls `tick` on its timer
/// 3. When the piece cannot move down it locks: its cells merge into the
///    settled cells, the next piece spawns, and full rows are cleared
/// 4. The game ends when a piece locks with a cell on row 0, or a new piece
///    spawns overlapping settled cells
///
/// The block-out check in step 4 goes beyond the row-0 rule: without it a
/// freshly spawned piece could sit inside the stack.
///
/// The board is single-threaded; drivers serialize calls themselves.
#[derive(Debug, Clone)]
pub struct Board<S = RandomPieceSource> {
    settled: SettledCells,
    active: Piece,
    source: S,
    stats: GameStats,
    gravity: bool,
    game_over: bool,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Creates a board with the default configuration (gravity on, random seed).
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(BoardConfig::default())
    }

    #[must_use]
    pub fn with_config(config: BoardConfig) -> Self {
        let source = config
            .seed
            .map_or_else(RandomPieceSource::new, RandomPieceSource::with_seed);
        Self::with_source(config, source)
    }
}

impl<S> Board<S>
where
    S: PieceSource,
{
    /// Creates a board drawing pieces from `source`.
    ///
    /// `config.seed` is not used; the source decides the sequence.
    #[must_use]
    pub fn with_source(config: BoardConfig, source: S) -> Self {
        Self::with_settled_cells(config, source, SettledCells::new())
    }

    /// Creates a board whose grid already holds `settled` cells.
    ///
    /// If the first piece overlaps them the game is over immediately.
    #[must_use]
    pub fn with_settled_cells(config: BoardConfig, mut source: S, settled: SettledCells) -> Self {
        let active = Piece::new(source.next_kind(None));
        debug!(kind = ?active.kind(), "spawned first piece");
        let mut board = Self {
            settled,
            active,
            source,
            stats: GameStats::new(),
            gravity: config.gravity,
            game_over: false,
        };
        board.check_block_out();
        board
    }

    #[must_use]
    pub fn settled_cells(&self) -> &SettledCells {
        &self.settled
    }

    #[must_use]
    pub fn active_piece(&self) -> Piece {
        self.active
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    #[must_use]
    pub fn level(&self) -> usize {
        self.stats.level()
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.stats.score()
    }

    #[must_use]
    pub fn cleared_lines(&self) -> usize {
        self.stats.cleared_lines()
    }

    #[must_use]
    pub fn ms_per_tick(&self) -> usize {
        self.stats.ms_per_tick()
    }

    #[must_use]
    pub fn gravity(&self) -> bool {
        self.gravity
    }

    pub fn set_gravity(&mut self, gravity: bool) {
        self.gravity = gravity;
    }

    /// Returns the settled cells and the piece cells as one set.
    ///
    /// Cells are deduplicated by position. Should a piece cell share a
    /// position with a settled cell, the settled one is kept.
    #[must_use]
    pub fn all_cells(&self) -> BTreeSet<Cell> {
        let mut cells: BTreeSet<Cell> = self.settled.iter().collect();
        cells.extend(self.active.cells());
        cells
    }

    /// Captures the state a driver needs to render the board.
    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            cells: self.all_cells().into_iter().collect(),
            active: self.active,
            stats: self.stats.clone(),
            gravity: self.gravity,
            game_over: self.game_over,
        }
    }

    pub fn move_left(&mut self) {
        let _ = self.try_move_left();
    }

    pub fn move_right(&mut self) {
        let _ = self.try_move_right();
    }

    pub fn rotate(&mut self) {
        let _ = self.try_rotate();
    }

    pub fn try_move_left(&mut self) -> Result<(), MoveError> {
        self.try_shift(-1, 0)
    }

    pub fn try_move_right(&mut self) -> Result<(), MoveError> {
        self.try_shift(1, 0)
    }

    /// Rotates the piece clockwise if every rotated cell is on the board and
    /// free. There are no wall kicks.
    pub fn try_rotate(&mut self) -> Result<(), MoveError> {
        self.ensure_playing()?;
        if !self.fits(self.active.rotated_cells()) {
            return Err(MoveError::Blocked);
        }
        self.active.rotate();
        Ok(())
    }

    /// Moves the piece down one row, or locks it if it has landed.
    pub fn tick(&mut self) -> TickOutcome {
        if self.game_over {
            return TickOutcome::Ignored;
        }
        if self.try_shift(0, 1).is_ok() {
            return TickOutcome::Moved;
        }
        self.lock_piece()
    }

    /// Locks the piece where it stands and spawns the next one.
    ///
    /// This is what [`Self::tick`] does once the piece has landed; drivers
    /// can call it directly to lock early.
    pub fn spawn_next_piece(&mut self) -> TickOutcome {
        if self.game_over {
            return TickOutcome::Ignored;
        }
        self.lock_piece()
    }

    fn ensure_playing(&self) -> Result<(), MoveError> {
        if self.game_over {
            return Err(MoveError::GameOver);
        }
        Ok(())
    }

    fn fits(&self, cells: [Cell; 4]) -> bool {
        cells
            .iter()
            .all(|c| c.position().is_on_board() && !self.settled.contains(c.position()))
    }

    fn try_shift(&mut self, dx: i32, dy: i32) -> Result<(), MoveError> {
        self.ensure_playing()?;
        if !self.fits(self.active.translated_cells(dx, dy)) {
            return Err(MoveError::Blocked);
        }
        self.active.translate(dx, dy);
        Ok(())
    }

    fn lock_piece(&mut self) -> TickOutcome {
        if self.active.positions().any(|p| p.y == 0) {
            self.end_game("piece locked on the top row");
            return TickOutcome::GameOver;
        }

        self.settled.insert_piece(&self.active);
        let previous = self.active.kind();
        self.active = Piece::new(self.source.next_kind(Some(previous)));
        debug!(locked = ?previous, next = ?self.active.kind(), "locked piece");

        let cleared_lines = self.clear_lines();
        self.stats.record_lock(cleared_lines);

        if self.check_block_out() {
            return TickOutcome::GameOver;
        }
        TickOutcome::Locked { cleared_lines }
    }

    /// Runs the line-clear cascade and returns the number of rows removed.
    fn clear_lines(&mut self) -> usize {
        let mut total = 0;
        loop {
            let full_rows = self.settled.full_rows();
            let Some(&lowest) = full_rows.last() else {
                break;
            };

            for &y in &full_rows {
                self.settled.clear_row(y);
            }
            self.stats.record_clear(full_rows.len());
            total += full_rows.len();
            debug!(
                rows = full_rows.len(),
                score = self.stats.score(),
                level = self.stats.level(),
                "cleared rows"
            );

            if !self.gravity || lowest == BOARD_HEIGHT - 1 {
                break;
            }
            if !self.settled.compact_below(lowest) {
                break;
            }
            debug!(row = lowest, "compacted columns below cleared row");
        }
        total
    }

    fn check_block_out(&mut self) -> bool {
        if self.settled.collides(self.active.positions()) {
            self.end_game("spawned piece overlaps settled cells");
            return true;
        }
        false
    }

    fn end_game(&mut self, reason: &str) {
        self.game_over = true;
        info!(
            reason,
            score = self.stats.score(),
            level = self.stats.level(),
            cleared_lines = self.stats.cleared_lines(),
            "game over"
        );
    }
}

impl<S> fmt::Display for Board<S> {
    /// One line per row listing shape types, `0` for empty cells.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let piece: Vec<Cell> = self.active.cells().to_vec();
        for y in 0..BOARD_HEIGHT {
            f.write_str("[")?;
            for x in 0..BOARD_WIDTH {
                let position = Position::new(x, y);
                let kind = piece
                    .iter()
                    .find(|c| c.position() == position)
                    .map(|c| c.kind())
                    .or_else(|| self.settled.get(position));
                if x > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", kind.map_or(0, PieceKind::shape_type))?;
            }
            f.write_str("]\n")?;
        }
        Ok(())
    }
}

/// Serializable view of a board for drivers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardSnapshot {
    /// Settled and piece cells, deduplicated by position.
    pub cells: Vec<Cell>,
    pub active: Piece,
    pub stats: GameStats,
    pub gravity: bool,
    pub game_over: bool,
}
