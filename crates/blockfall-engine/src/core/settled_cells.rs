use std::collections::BTreeMap;

use arrayvec::ArrayVec;

use crate::ParseCellsError;

use super::{
    BOARD_HEIGHT, BOARD_WIDTH,
    cell::{Cell, Position},
    piece::{Piece, PieceKind},
};

const ROWS: usize = BOARD_HEIGHT as usize;
const COLUMNS: usize = BOARD_WIDTH as usize;

/// Row indices of the full rows found by one scan, top to bottom.
pub type FullRows = ArrayVec<i32, ROWS>;

/// Locked blocks of fallen pieces, keyed by position.
///
/// At most one cell can exist per position. Every transformation (row clear,
/// shift, compaction) rebuilds the map from fresh positions instead of
/// editing coordinates in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettledCells {
    cells: BTreeMap<Position, PieceKind>,
}

impl SettledCells {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        self.cells.contains_key(&position)
    }

    #[must_use]
    pub fn get(&self, position: Position) -> Option<PieceKind> {
        self.cells.get(&position).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells
            .iter()
            .map(|(&position, &kind)| Cell::at(position, kind))
    }

    /// Adds a single cell. An existing cell at the same position is replaced.
    pub fn insert(&mut self, cell: Cell) {
        self.cells.insert(cell.position(), cell.kind());
    }

    /// Absorbs the cells of a locked piece.
    pub fn insert_piece(&mut self, piece: &Piece) {
        for cell in piece.cells() {
            self.insert(cell);
        }
    }

    /// Returns `true` if any of the positions is occupied.
    pub fn collides(&self, mut positions: impl Iterator<Item = Position>) -> bool {
        positions.any(|p| self.contains(p))
    }

    /// Returns `true` if every column of row `y` holds a cell.
    #[must_use]
    pub fn is_row_full(&self, y: i32) -> bool {
        (0..BOARD_WIDTH).all(|x| self.contains(Position::new(x, y)))
    }

    /// Scans all rows and returns the full ones, top to bottom.
    #[must_use]
    pub fn full_rows(&self) -> FullRows {
        (0..BOARD_HEIGHT).filter(|&y| self.is_row_full(y)).collect()
    }

    /// Removes every cell of row `y` and moves each cell above it one row down.
    pub fn clear_row(&mut self, y: i32) {
        self.cells = std::mem::take(&mut self.cells)
            .into_iter()
            .filter(|(position, _)| position.y != y)
            .map(|(position, kind)| {
                if position.y < y {
                    (position.offset(0, 1), kind)
                } else {
                    (position, kind)
                }
            })
            .collect();
    }

    /// Counts the contiguous empty cells in column `x`, starting directly
    /// below row `y` and stopping at the first occupied cell or the floor.
    #[must_use]
    pub fn empty_run_below(&self, x: i32, y: i32) -> i32 {
        let run = (y + 1..BOARD_HEIGHT)
            .take_while(|&below| !self.contains(Position::new(x, below)))
            .count();
        i32::try_from(run).unwrap_or(BOARD_HEIGHT)
    }

    /// Drops every column's cells at or above row `y` into the empty run
    /// directly below that row.
    ///
    /// Each column is handled independently and only the gap touching row
    /// `y + 1` is filled. Returns `true` if any cell moved.
    pub fn compact_below(&mut self, y: i32) -> bool {
        let mut drops = [0; COLUMNS];
        for (x, drop) in (0..BOARD_WIDTH).zip(&mut drops) {
            *drop = self.empty_run_below(x, y);
        }

        let mut moved = false;
        self.cells = std::mem::take(&mut self.cells)
            .into_iter()
            .map(|(position, kind)| {
                let drop = usize::try_from(position.x)
                    .ok()
                    .and_then(|x| drops.get(x).copied())
                    .unwrap_or(0);
                if drop > 0 && position.y <= y {
                    moved = true;
                    (position.offset(0, drop), kind)
                } else {
                    (position, kind)
                }
            })
            .collect();
        moved
    }

    /// Builds settled cells from an ASCII fixture.
    ///
    /// Rows are listed top to bottom starting at row 0; blank lines and
    /// whitespace are ignored. Each row must have exactly 10 cells:
    ///
    /// - `.` empty
    /// - `1`..`7` or a piece letter (`I`, `O`, `T`, `S`, `Z`, `J`, `L`): a cell of that kind
    /// - `#` a cell without a meaningful kind (stored as `I`)
    ///
    /// # Example
    ///
    /// ```
    /// use blockfall_engine::{PieceKind, Position, SettledCells};
    ///
    /// let cells = SettledCells::from_ascii(
    ///     r"
    ///     ..........
    ///     #T.......3
    ///     ",
    /// )
    /// .unwrap();
    /// assert_eq!(cells.len(), 3);
    /// assert_eq!(cells.get(Position::new(1, 1)), Some(PieceKind::T));
    /// assert_eq!(cells.get(Position::new(9, 1)), Some(PieceKind::T));
    /// ```
    pub fn from_ascii(art: &str) -> Result<Self, ParseCellsError> {
        let rows: Vec<Vec<char>> = art
            .lines()
            .map(|line| line.chars().filter(|c| !c.is_whitespace()).collect::<Vec<_>>())
            .filter(|row| !row.is_empty())
            .collect();
        if rows.len() > ROWS {
            return Err(ParseCellsError::TooManyRows {
                rows: rows.len(),
                max: ROWS,
            });
        }

        let mut cells = Self::new();
        for ((y, row), board_y) in rows.iter().enumerate().zip(0..) {
            if row.len() != COLUMNS {
                return Err(ParseCellsError::RowWidth {
                    row: y,
                    len: row.len(),
                    expected: COLUMNS,
                });
            }
            for ((x, &ch), board_x) in row.iter().enumerate().zip(0..) {
                let kind = match ch {
                    '.' => continue,
                    '#' => PieceKind::I,
                    '1'..='7' => ch
                        .to_digit(10)
                        .and_then(|d| u8::try_from(d).ok())
                        .and_then(PieceKind::from_shape_type)
                        .ok_or(ParseCellsError::UnknownCell { ch, x, y })?,
                    _ => PieceKind::from_char(ch).ok_or(ParseCellsError::UnknownCell { ch, x, y })?,
                };
                cells.insert(Cell::new(board_x, board_y, kind));
            }
        }
        Ok(cells)
    }
}
