//! Simulation core of a falling-block puzzle game.
//!
//! The crate owns the grid, the falling piece, collision rules, line clearing
//! (with an optional gravity cascade), scoring and level/speed derivation.
//! Rendering, input and timing live in the driver, which feeds commands to a
//! [`Board`] and reads its status back.
//!
//! # Example
//!
//! ```
//! use blockfall_engine::{Board, BoardConfig};
//!
//! let mut board = Board::with_config(BoardConfig::default());
//! board.move_left();
//! board.rotate();
//! while !board.tick().is_locked() {}
//!
//! assert!(!board.is_game_over());
//! assert_eq!(board.settled_cells().len(), 4);
//! ```

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Reason a movement or rotation command was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum MoveError {
    #[display("piece blocked by a wall or a settled cell")]
    Blocked,
    #[display("game is already over")]
    GameOver,
}

/// Error returned when a settled-cell fixture cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseCellsError {
    #[display("row {row} has {len} cells, expected {expected}")]
    RowWidth {
        row: usize,
        len: usize,
        expected: usize,
    },
    #[display("fixture has {rows} rows, at most {max} allowed")]
    TooManyRows { rows: usize, max: usize },
    #[display("unknown cell character {ch:?} at ({x}, {y})")]
    UnknownCell { ch: char, x: usize, y: usize },
}
