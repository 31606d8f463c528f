pub use self::{cell::*, piece::*, settled_cells::*};

pub(crate) mod cell;
pub(crate) mod piece;
pub(crate) mod settled_cells;

/// Board width in cells.
pub const BOARD_WIDTH: i32 = 10;

/// Board height in cells. Row 0 is the top row.
pub const BOARD_HEIGHT: i32 = 22;
