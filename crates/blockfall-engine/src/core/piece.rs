use serde::{Deserialize, Serialize};

use super::cell::{Cell, Position};

/// A falling tetromino with anchor position, rotation, and kind.
///
/// The four occupied cells are derived from the kind's shape catalog, the
/// rotation state and the anchor, which is the top-left corner of the
/// piece's bounding box.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Piece, PieceKind};
///
/// let mut piece = Piece::new(PieceKind::T);
/// let preview = piece.rotated_cells();
/// piece.rotate();
/// assert_eq!(piece.cells(), preview);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    anchor: Position,
    rotation: PieceRotation,
    kind: PieceKind,
}

impl Serialize for Piece {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: "kind#rotation@x,y" (e.g., "S#1@4,18")
        let s = format!(
            "{}#{}@{},{}",
            self.kind.as_char(),
            self.rotation.0,
            self.anchor.x,
            self.anchor.y
        );
        serializer.serialize_str(&s)
    }
}

impl Piece {
    /// Creates a piece of the given kind at its spawn anchor.
    #[must_use]
    pub fn new(kind: PieceKind) -> Self {
        Self {
            anchor: kind.spawn_anchor(),
            rotation: PieceRotation::default(),
            kind,
        }
    }

    #[must_use]
    pub fn anchor(&self) -> Position {
        self.anchor
    }

    #[must_use]
    pub fn rotation(&self) -> PieceRotation {
        self.rotation
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Returns the four occupied cells.
    #[must_use]
    pub fn cells(&self) -> [Cell; 4] {
        self.cells_with(self.rotation)
    }

    /// Returns the cells the piece would occupy after one clockwise rotation.
    ///
    /// The piece itself is left untouched.
    #[must_use]
    pub fn rotated_cells(&self) -> [Cell; 4] {
        self.cells_with(self.rotation.rotated_right())
    }

    /// Commits the rotation previewed by [`Self::rotated_cells`].
    pub fn rotate(&mut self) {
        self.rotation = self.rotation.rotated_right();
    }

    /// Shifts every cell of the piece by `(dx, dy)`.
    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.anchor = self.anchor.offset(dx, dy);
    }

    /// Returns the cells the piece would occupy after [`Self::translate`].
    #[must_use]
    pub fn translated_cells(&self, dx: i32, dy: i32) -> [Cell; 4] {
        self.cells().map(|cell| Cell::at(cell.position().offset(dx, dy), cell.kind()))
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells().into_iter().map(Cell::position)
    }

    fn cells_with(&self, rotation: PieceRotation) -> [Cell; 4] {
        self.kind
            .offsets(rotation)
            .map(|(dx, dy)| Cell::at(self.anchor.offset(dx.into(), dy.into()), self.kind))
    }
}

/// Rotation state of a piece.
///
/// - `0`: spawn orientation
/// - `1`: 90° clockwise
/// - `2`: 180°
/// - `3`: 270° clockwise
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PieceRotation(u8);

impl PieceRotation {
    #[must_use]
    pub fn rotated_right(self) -> Self {
        PieceRotation((self.0 + 1) % 4)
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// The seven piece kinds, numbered as shape types `1..=7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    I = 1,
    O = 2,
    T = 3,
    S = 4,
    Z = 5,
    J = 6,
    L = 7,
}

impl PieceKind {
    /// Number of piece kinds (7).
    pub const LEN: usize = 7;

    /// All kinds in shape-type order.
    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Returns the shape type number (`1..=7`).
    #[must_use]
    pub const fn shape_type(self) -> u8 {
        self as u8
    }

    /// Parses a shape type number.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_shape_type(3), Some(PieceKind::T));
    /// assert_eq!(PieceKind::from_shape_type(0), None);
    /// assert_eq!(PieceKind::from_shape_type(8), None);
    /// ```
    #[must_use]
    pub const fn from_shape_type(shape_type: u8) -> Option<Self> {
        match shape_type {
            1 => Some(PieceKind::I),
            2 => Some(PieceKind::O),
            3 => Some(PieceKind::T),
            4 => Some(PieceKind::S),
            5 => Some(PieceKind::Z),
            6 => Some(PieceKind::J),
            7 => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Returns the single character representation of this piece kind.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::T => 'T',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('I'), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'T' => Some(PieceKind::T),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            _ => None,
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize - 1
    }

    fn offsets(self, rotation: PieceRotation) -> ShapeOffsets {
        PIECE_SHAPES[self.index()][rotation.as_usize()]
    }

    /// Spawn anchor: the bounding box is centered horizontally and the
    /// topmost occupied row lands on row 0.
    const fn spawn_anchor(self) -> Position {
        match self {
            PieceKind::I => Position::new(3, -1),
            PieceKind::O => Position::new(4, 0),
            _ => Position::new(3, 0),
        }
    }
}

/// Occupied cells of a piece relative to its bounding-box corner.
type ShapeOffsets = [(i8, i8); 4];

/// Generates all 4 rotation states of a shape by rotating it 90° clockwise
/// inside its `size`×`size` bounding box.
const fn shape_rotations(size: i8, shape: ShapeOffsets) -> [ShapeOffsets; 4] {
    let mut rotations = [shape; 4];
    let mut i = 1;
    while i < 4 {
        let mut j = 0;
        while j < 4 {
            let (x, y) = rotations[i - 1][j];
            rotations[i][j] = (size - 1 - y, x);
            j += 1;
        }
        i += 1;
    }
    rotations
}

const PIECE_SHAPES: [[ShapeOffsets; 4]; PieceKind::LEN] = [
    // I-piece: ....
    //          IIII
    shape_rotations(4, [(0, 1), (1, 1), (2, 1), (3, 1)]),
    // O-piece: OO
    //          OO
    shape_rotations(2, [(0, 0), (1, 0), (0, 1), (1, 1)]),
    // T-piece: .T.
    //          TTT
    shape_rotations(3, [(1, 0), (0, 1), (1, 1), (2, 1)]),
    // S-piece: .SS
    //          SS.
    shape_rotations(3, [(1, 0), (2, 0), (0, 1), (1, 1)]),
    // Z-piece: ZZ.
    //          .ZZ
    shape_rotations(3, [(0, 0), (1, 0), (1, 1), (2, 1)]),
    // J-piece: J..
    //          JJJ
    shape_rotations(3, [(0, 0), (0, 1), (1, 1), (2, 1)]),
    // L-piece: ..L
    //          LLL
    shape_rotations(3, [(2, 0), (0, 1), (1, 1), (2, 1)]),
];
