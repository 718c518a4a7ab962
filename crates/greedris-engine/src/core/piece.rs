use std::{ops::RangeInclusive, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::ShapeParseError;

use super::{BOARD_WIDTH, board::Board};

/// A falling piece: a shape from the catalog plus its rotation index and offset.
///
/// The offset is the position of the top-left corner of the shape's 4×4 bounding
/// square, in board coordinates. Offsets are signed because a piece may be
/// partially above the board (negative `y`) while spawning, and its bounding
/// square may hang over the left wall (negative `x`) as long as no occupied cell
/// does.
///
/// Moves and rotations never check validity; re-validate with
/// [`Board::is_valid`](super::Board::is_valid) and revert when needed.
///
/// # Example
///
/// ```
/// use greedris_engine::{Piece, ShapeKind};
///
/// let mut piece = Piece::spawn(ShapeKind::T);
/// piece.rotate();
/// assert_eq!(piece.rotation(), 1);
/// piece.unrotate();
/// piece.unrotate();
/// assert_eq!(piece.rotation(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    kind: ShapeKind,
    rotation: usize,
    x: i32,
    y: i32,
}

impl Serialize for Piece {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: "kind#rotation@x,y" (e.g., "S#1@4,-1")
        let s = format!("{}#{}@{},{}", self.kind, self.rotation, self.x, self.y);
        serializer.serialize_str(&s)
    }
}

impl<'de> Deserialize<'de> for Piece {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error as _;

        let s = String::deserialize(deserializer)?;

        let (kind_str, rest) = s.split_once('#').ok_or_else(|| {
            D::Error::custom(format!("missing '#' in format 'kind#rotation@x,y', got '{s}'"))
        })?;
        let (rotation_str, position_str) = rest.split_once('@').ok_or_else(|| {
            D::Error::custom(format!("missing '@' in format 'kind#rotation@x,y', got '{s}'"))
        })?;
        let (x_str, y_str) = position_str.split_once(',').ok_or_else(|| {
            D::Error::custom(format!("missing ',' in format 'kind#rotation@x,y', got '{s}'"))
        })?;

        let kind = kind_str.parse::<ShapeKind>().map_err(D::Error::custom)?;
        let rotation = rotation_str.parse::<usize>().map_err(|e| {
            D::Error::custom(format!("invalid rotation: {rotation_str} ({e})"))
        })?;
        if rotation >= kind.num_rotations() {
            return Err(D::Error::custom(format!(
                "rotation of {kind} must be below {}, got {rotation}",
                kind.num_rotations()
            )));
        }
        let x = x_str
            .parse::<i32>()
            .map_err(|e| D::Error::custom(format!("invalid x offset: {x_str} ({e})")))?;
        let y = y_str
            .parse::<i32>()
            .map_err(|e| D::Error::custom(format!("invalid y offset: {y_str} ({e})")))?;

        Ok(Piece {
            kind,
            rotation,
            x,
            y,
        })
    }
}

impl Piece {
    /// Horizontal offset where new pieces appear.
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub const SPAWN_X: i32 = (BOARD_WIDTH / 2) as i32 - 2;
    /// Vertical offset of pieces drawn into the preview queue.
    pub const SPAWN_Y: i32 = 0;
    /// Vertical offset of the first piece of a round, one row above the board.
    pub const FIRST_SPAWN_Y: i32 = -1;

    #[must_use]
    pub fn new(kind: ShapeKind, x: i32, y: i32) -> Self {
        Self {
            kind,
            rotation: 0,
            x,
            y,
        }
    }

    /// Creates a piece in rotation 0 at the regular spawn offset.
    #[must_use]
    pub fn spawn(kind: ShapeKind) -> Self {
        Self::new(kind, Self::SPAWN_X, Self::SPAWN_Y)
    }

    /// Returns a copy fixed at the given rotation index.
    ///
    /// # Panics
    ///
    /// Panics if `rotation` is not below the shape's rotation count.
    #[must_use]
    pub fn with_rotation(self, rotation: usize) -> Self {
        assert!(
            rotation < self.kind.num_rotations(),
            "rotation {rotation} out of range for shape {} ({} rotations)",
            self.kind,
            self.kind.num_rotations()
        );
        Self { rotation, ..self }
    }

    #[must_use]
    pub fn with_position(self, x: i32, y: i32) -> Self {
        Self { x, y, ..self }
    }

    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    #[must_use]
    pub fn shape(&self) -> &'static Shape {
        self.kind.shape()
    }

    #[must_use]
    pub fn rotation(&self) -> usize {
        self.rotation
    }

    #[must_use]
    pub fn x(&self) -> i32 {
        self.x
    }

    #[must_use]
    pub fn y(&self) -> i32 {
        self.y
    }

    #[must_use]
    pub fn rotation_state(&self) -> &'static RotationState {
        self.kind.shape().rotation(self.rotation)
    }

    /// Advances to the next rotation state, wrapping to state 0 after the last.
    pub fn rotate(&mut self) {
        self.rotation = (self.rotation + 1) % self.kind.num_rotations();
    }

    /// Steps back to the previous rotation state, wrapping to the last after state 0.
    pub fn unrotate(&mut self) {
        let n = self.kind.num_rotations();
        self.rotation = (self.rotation + n - 1) % n;
    }

    #[must_use]
    pub fn moved(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    #[must_use]
    pub fn left(self) -> Self {
        self.moved(-1, 0)
    }

    #[must_use]
    pub fn right(self) -> Self {
        self.moved(1, 0)
    }

    #[must_use]
    pub fn down(self) -> Self {
        self.moved(0, 1)
    }

    /// Hard-drop resting position of this piece on `board`.
    ///
    /// Moves down while the position is valid, then steps back up one row. If the
    /// piece is already invalid where it starts (the stack reached it), the loop
    /// never advances and the result is one row above the start.
    #[must_use]
    pub fn simulate_drop_position(self, board: &Board) -> Self {
        let mut dropped = self;
        while board.is_valid(&dropped) {
            dropped = dropped.down();
        }
        dropped.moved(0, -1)
    }

    /// Relative `(dx, dy)` offsets of the occupied cells in the current rotation.
    ///
    /// Cells are yielded row by row, but callers should only rely on set membership.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + use<> {
        self.rotation_state().cells()
    }

    /// Absolute board coordinates of the occupied cells.
    pub fn occupied_positions(&self) -> impl Iterator<Item = (i32, i32)> + use<> {
        let (x0, y0) = (self.x, self.y);
        self.cells().map(move |(dx, dy)| (x0 + to_i32(dx), y0 + to_i32(dy)))
    }

    /// `(min_col, max_col)` occupied within the current rotation's bounding square.
    #[must_use]
    pub fn horizontal_extent(&self) -> (usize, usize) {
        self.rotation_state().horizontal_extent()
    }

    /// Horizontal offsets that keep every cell of the current rotation inside the walls.
    #[must_use]
    pub fn offset_range(&self) -> RangeInclusive<i32> {
        self.rotation_state().offset_range()
    }
}

/// One of the seven tetromino shapes.
///
/// Discriminants index the shape catalog.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[repr(u8)]
pub enum ShapeKind {
    T = 0,
    L = 1,
    J = 2,
    O = 3,
    S = 4,
    Z = 5,
    I = 6,
}

impl ShapeKind {
    /// Number of shapes (7).
    pub const LEN: usize = 7;

    /// All shapes in catalog order.
    pub const ALL: [Self; Self::LEN] = [
        Self::T,
        Self::L,
        Self::J,
        Self::O,
        Self::S,
        Self::Z,
        Self::I,
    ];

    #[must_use]
    pub fn shape(self) -> &'static Shape {
        &SHAPES[self as usize]
    }

    #[must_use]
    pub fn num_rotations(self) -> usize {
        self.shape().num_rotations()
    }

    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::T => 'T',
            Self::L => 'L',
            Self::J => 'J',
            Self::O => 'O',
            Self::S => 'S',
            Self::Z => 'Z',
            Self::I => 'I',
        }
    }

    /// Parses a shape from its letter (case-insensitive).
    ///
    /// ```
    /// use greedris_engine::ShapeKind;
    ///
    /// assert_eq!(ShapeKind::from_char('o'), Some(ShapeKind::O));
    /// assert_eq!(ShapeKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'T' => Some(Self::T),
            'L' => Some(Self::L),
            'J' => Some(Self::J),
            'O' => Some(Self::O),
            'S' => Some(Self::S),
            'Z' => Some(Self::Z),
            'I' => Some(Self::I),
            _ => None,
        }
    }
}

impl FromStr for ShapeKind {
    type Err = ShapeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        let kind = match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c),
            _ => None,
        };
        kind.ok_or_else(|| ShapeParseError {
            input: s.to_owned(),
        })
    }
}

/// Display color of a shape. Only drivers care about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Read-only catalog entry: the ordered rotation states of one shape.
#[derive(Debug)]
pub struct Shape {
    kind: ShapeKind,
    rotations: &'static [RotationState],
    color: Rgb,
}

impl Shape {
    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    #[must_use]
    pub fn color(&self) -> Rgb {
        self.color
    }

    #[must_use]
    pub fn num_rotations(&self) -> usize {
        self.rotations.len()
    }

    /// # Panics
    ///
    /// Panics if `rotation` is not below [`Self::num_rotations`].
    #[must_use]
    pub fn rotation(&self, rotation: usize) -> &RotationState {
        &self.rotations[rotation]
    }

    pub fn rotations(&self) -> impl ExactSizeIterator<Item = &RotationState> {
        self.rotations.iter()
    }

    /// `(min_col, max_col)` occupied in the given rotation.
    #[must_use]
    pub fn horizontal_extent(&self, rotation: usize) -> (usize, usize) {
        self.rotation(rotation).horizontal_extent()
    }
}

/// Occupancy of one rotation state within a 4×4 bounding square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationState {
    cells: [[bool; 4]; 4],
    min_col: usize,
    max_col: usize,
}

impl RotationState {
    /// Builds a rotation state from four rows of `O` (occupied) and `.` (empty).
    const fn parse(rows: [&str; 4]) -> Self {
        let mut cells = [[false; 4]; 4];
        let mut min_col = 4;
        let mut max_col = 0;
        let mut y = 0;
        while y < 4 {
            let row = rows[y].as_bytes();
            assert!(row.len() == 4);
            let mut x = 0;
            while x < 4 {
                if row[x] == b'O' {
                    cells[y][x] = true;
                    if x < min_col {
                        min_col = x;
                    }
                    if x > max_col {
                        max_col = x;
                    }
                }
                x += 1;
            }
            y += 1;
        }
        assert!(min_col <= max_col, "rotation state has no occupied cell");
        Self {
            cells,
            min_col,
            max_col,
        }
    }

    #[must_use]
    pub fn is_occupied(&self, dx: usize, dy: usize) -> bool {
        self.cells[dy][dx]
    }

    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + use<> {
        let cells = self.cells;
        (0..4).flat_map(move |dy| (0..4).filter(move |&dx| cells[dy][dx]).map(move |dx| (dx, dy)))
    }

    #[must_use]
    pub fn horizontal_extent(&self) -> (usize, usize) {
        (self.min_col, self.max_col)
    }

    /// Legal horizontal offsets: `-min_col ..= BOARD_WIDTH - 1 - max_col`.
    #[must_use]
    pub fn offset_range(&self) -> RangeInclusive<i32> {
        -to_i32(self.min_col)..=to_i32(BOARD_WIDTH - 1 - self.max_col)
    }
}

#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const fn to_i32(v: usize) -> i32 {
    v as i32
}

const T_ROTATIONS: [RotationState; 4] = [
    RotationState::parse([".O..", "OOO.", "....", "...."]),
    RotationState::parse([".O..", ".OO.", ".O..", "...."]),
    RotationState::parse(["....", "OOO.", ".O..", "...."]),
    RotationState::parse([".O..", "OO..", ".O..", "...."]),
];

const L_ROTATIONS: [RotationState; 4] = [
    RotationState::parse(["..O.", "OOO.", "....", "...."]),
    RotationState::parse([".O..", ".O..", ".OO.", "...."]),
    RotationState::parse(["....", "OOO.", "O...", "...."]),
    RotationState::parse(["OO..", ".O..", ".O..", "...."]),
];

const J_ROTATIONS: [RotationState; 4] = [
    RotationState::parse(["O...", "OOO.", "....", "...."]),
    RotationState::parse([".OO.", ".O..", ".O..", "...."]),
    RotationState::parse(["....", "OOO.", "..O.", "...."]),
    RotationState::parse(["..O.", "..O.", ".OO.", "...."]),
];

const O_ROTATIONS: [RotationState; 1] =
    [RotationState::parse(["....", ".OO.", ".OO.", "...."])];

const S_ROTATIONS: [RotationState; 2] = [
    RotationState::parse(["....", ".OO.", "OO..", "...."]),
    RotationState::parse([".O..", ".OO.", "..O.", "...."]),
];

const Z_ROTATIONS: [RotationState; 2] = [
    RotationState::parse(["....", "OO..", ".OO.", "...."]),
    RotationState::parse(["..O.", ".OO.", ".O..", "...."]),
];

const I_ROTATIONS: [RotationState; 2] = [
    RotationState::parse(["....", "OOOO", "....", "...."]),
    RotationState::parse([".O..", ".O..", ".O..", ".O.."]),
];

static SHAPES: [Shape; ShapeKind::LEN] = [
    Shape {
        kind: ShapeKind::T,
        rotations: &T_ROTATIONS,
        color: Rgb(192, 73, 188),
    },
    Shape {
        kind: ShapeKind::L,
        rotations: &L_ROTATIONS,
        color: Rgb(170, 105, 62),
    },
    Shape {
        kind: ShapeKind::J,
        rotations: &J_ROTATIONS,
        color: Rgb(77, 64, 159),
    },
    Shape {
        kind: ShapeKind::O,
        rotations: &O_ROTATIONS,
        color: Rgb(177, 156, 70),
    },
    Shape {
        kind: ShapeKind::S,
        rotations: &S_ROTATIONS,
        color: Rgb(173, 225, 81),
    },
    Shape {
        kind: ShapeKind::Z,
        rotations: &Z_ROTATIONS,
        color: Rgb(167, 63, 64),
    },
    Shape {
        kind: ShapeKind::I,
        rotations: &I_ROTATIONS,
        color: Rgb(93, 178, 135),
    },
];
