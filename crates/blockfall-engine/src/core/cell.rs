use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
};

use serde::{Deserialize, Serialize};

use super::{BOARD_HEIGHT, BOARD_WIDTH, piece::PieceKind};

/// Grid coordinate.
///
/// - X increases rightward (columns)
/// - Y increases downward (rows), row 0 is the top of the board
///
/// Coordinates are signed so that a piece anchor may sit above or left of the
/// board while its occupied cells are still inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Returns `true` if the position lies within `[0, WIDTH) x [0, HEIGHT)`.
    #[must_use]
    pub const fn is_on_board(self) -> bool {
        0 <= self.x && self.x < BOARD_WIDTH && 0 <= self.y && self.y < BOARD_HEIGHT
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A block on the board tagged with the kind of piece that placed it.
///
/// Two cells are equal when they share a position, whatever their kinds.
/// Ordering and hashing follow the same rule, so a set of cells is a set of
/// positions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Cell {
    position: Position,
    kind: PieceKind,
}

impl Cell {
    #[must_use]
    pub const fn new(x: i32, y: i32, kind: PieceKind) -> Self {
        Self {
            position: Position::new(x, y),
            kind,
        }
    }

    #[must_use]
    pub const fn at(position: Position, kind: PieceKind) -> Self {
        Self { position, kind }
    }

    #[must_use]
    pub const fn position(self) -> Position {
        self.position
    }

    #[must_use]
    pub const fn x(self) -> i32 {
        self.position.x
    }

    #[must_use]
    pub const fn y(self) -> i32 {
        self.position.y
    }

    #[must_use]
    pub const fn kind(self) -> PieceKind {
        self.kind
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position
    }
}

impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.position.hash(state);
    }
}

impl PartialOrd for Cell {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cell {
    fn cmp(&self, other: &Self) -> Ordering {
        self.position.cmp(&other.position)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn test_cell_equality_ignores_kind() {
        let a = Cell::new(3, 4, PieceKind::T);
        let b = Cell::new(3, 4, PieceKind::L);
        let c = Cell::new(4, 3, PieceKind::T);

        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: BTreeSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_position_bounds() {
        assert!(Position::new(0, 0).is_on_board());
        assert!(Position::new(BOARD_WIDTH - 1, BOARD_HEIGHT - 1).is_on_board());
        assert!(!Position::new(-1, 0).is_on_board());
        assert!(!Position::new(0, -1).is_on_board());
        assert!(!Position::new(BOARD_WIDTH, 0).is_on_board());
        assert!(!Position::new(0, BOARD_HEIGHT).is_on_board());
    }

    #[test]
    fn test_cell_serialization() {
        let cell = Cell::new(2, 7, PieceKind::S);
        let json = serde_json::to_string(&cell).unwrap();
        assert_eq!(json, r#"{"position":{"x":2,"y":7},"kind":"S"}"#);
    }
}
