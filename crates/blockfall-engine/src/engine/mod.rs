//! Game state machine built on the core value types.
//!
//! - [`Board`] - one game: settled cells, the falling piece, line clearing,
//!   game over
//! - [`GameStats`] - score, cleared rows, level and tick speed
//! - [`PieceSource`] / [`RandomPieceSource`] - piece selection without
//!   immediate repeats
//! - [`PieceSeed`] - seed for deterministic piece sequences
//! - [`BoardConfig`] - gravity mode and seed
//!
//! # Example
//!
//! ```
//! use blockfall_engine::{Board, BoardConfig, PieceSeed, TickOutcome};
//!
//! let seed = PieceSeed::from_bytes([42; 16]);
//! let mut board = Board::with_config(BoardConfig::default().with_seed(seed));
//!
//! board.move_right();
//! loop {
//!     match board.tick() {
//!         TickOutcome::Moved => {}
//!         TickOutcome::Locked { cleared_lines } => {
//!             println!("locked, {cleared_lines} rows cleared");
//!             break;
//!         }
//!         TickOutcome::GameOver | TickOutcome::Ignored => break,
//!     }
//! }
//! assert_eq!(board.stats().locked_pieces(), 1);
//! ```

pub use self::{board::*, board_config::*, game_stats::*, piece_source::*};

mod board;
mod board_config;
mod game_stats;
mod piece_source;
