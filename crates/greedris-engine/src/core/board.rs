use std::{fmt, str::FromStr};

use crate::BoardParseError;

use super::{
    BOARD_HEIGHT, BOARD_WIDTH,
    piece::{Piece, ShapeKind},
};

/// Occupancy marker of a single board cell.
///
/// The search only cares whether a cell is empty; the shape identity is kept
/// for drivers that want to draw the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::IsVariant)]
pub enum Block {
    /// Empty cell.
    #[default]
    Empty,
    /// Locked cell of a known shape.
    Piece(ShapeKind),
    /// Locked cell of unknown origin (e.g. read from an external board).
    Filled,
}

impl From<ShapeKind> for Block {
    fn from(kind: ShapeKind) -> Self {
        Block::Piece(kind)
    }
}

impl Block {
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Block::Empty => '.',
            Block::Piece(kind) => kind.as_char(),
            Block::Filled => '#',
        }
    }
}

/// A single row of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardRow {
    cells: [Block; BOARD_WIDTH],
}

impl BoardRow {
    pub const EMPTY: Self = Self {
        cells: [Block::Empty; BOARD_WIDTH],
    };

    #[must_use]
    pub fn cells(&self) -> &[Block; BOARD_WIDTH] {
        &self.cells
    }

    #[inline]
    #[must_use]
    pub fn is_cell_occupied(&self, x: usize) -> bool {
        !self.cells[x].is_empty()
    }

    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.cells.iter().all(|b| !b.is_empty())
    }

    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|b| !b.is_empty()).count()
    }
}

/// Locked-cell occupancy of the `BOARD_WIDTH × BOARD_HEIGHT` grid.
///
/// Row 0 is the top of the board and `x` grows to the right. The board is a
/// fixed-size value, so cloning it for a hypothetical placement is a plain copy
/// with no allocation.
///
/// # Example
///
/// ```
/// use greedris_engine::{Board, Piece, ShapeKind};
///
/// let mut board = Board::EMPTY;
/// let piece = Piece::new(ShapeKind::I, 0, 18);
/// assert!(board.is_valid(&piece));
///
/// board.lock(&piece, piece.kind());
/// assert_eq!(board.occupied_count(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: [BoardRow; BOARD_HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Board {
    pub const WIDTH: usize = BOARD_WIDTH;
    pub const HEIGHT: usize = BOARD_HEIGHT;

    pub const EMPTY: Self = Self {
        rows: [BoardRow::EMPTY; BOARD_HEIGHT],
    };

    #[must_use]
    pub fn row(&self, y: usize) -> &BoardRow {
        &self.rows[y]
    }

    /// Iterates rows from top to bottom.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &BoardRow> {
        self.rows.iter()
    }

    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Block {
        self.rows[y].cells[x]
    }

    #[must_use]
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        self.rows[y].is_cell_occupied(x)
    }

    pub fn set_cell(&mut self, x: usize, y: usize, block: Block) {
        self.rows[y].cells[x] = block;
    }

    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.rows.iter().map(BoardRow::occupied_count).sum()
    }

    /// Checks whether every cell of the piece lies inside the side and bottom walls
    /// on an empty cell.
    ///
    /// There is no upper bound: cells above the top row (negative `y`) are valid,
    /// so pieces can spawn partially outside the board.
    #[must_use]
    pub fn is_valid(&self, piece: &Piece) -> bool {
        piece.occupied_positions().all(|(x, y)| {
            let Ok(x) = usize::try_from(x) else {
                return false;
            };
            if x >= BOARD_WIDTH {
                return false;
            }
            match usize::try_from(y) {
                Ok(y) => y < BOARD_HEIGHT && !self.rows[y].is_cell_occupied(x),
                Err(_) => true,
            }
        })
    }

    /// Writes `marker` into every cell the piece occupies.
    ///
    /// Cells outside the grid (above the top row) are discarded.
    pub fn lock(&mut self, piece: &Piece, marker: impl Into<Block>) {
        let marker = marker.into();
        for (x, y) in piece.occupied_positions() {
            let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
                continue;
            };
            if x < BOARD_WIDTH && y < BOARD_HEIGHT {
                self.rows[y].cells[x] = marker;
            }
        }
    }

    /// Removes fully occupied rows and returns how many were removed.
    ///
    /// Rows are scanned bottom to top; every kept row moves down by the number of
    /// rows cleared below it, so simultaneous clears cascade in one pass.
    pub fn clear_full_rows(&mut self) -> usize {
        let mut count = 0;
        for y in (0..BOARD_HEIGHT).rev() {
            if self.rows[y].is_filled() {
                count += 1;
                continue;
            }
            if count > 0 {
                self.rows[y + count] = self.rows[y];
            }
        }
        self.rows[..count].fill(BoardRow::EMPTY);
        count
    }

    /// Parses a board from ASCII art.
    ///
    /// `.` is an empty cell, `#` a filled cell of unknown shape, and a shape
    /// letter (`T`, `L`, `J`, `O`, `S`, `Z`, `I`) a cell of that shape. Blank
    /// lines and surrounding whitespace are ignored. Rows are aligned to the
    /// bottom of the board, so only the non-empty part of a stack needs to be
    /// written.
    pub fn from_ascii(art: &str) -> Result<Self, BoardParseError> {
        let lines: Vec<&str> = art
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if lines.len() > BOARD_HEIGHT {
            return Err(BoardParseError::TooManyRows {
                rows: lines.len(),
                max: BOARD_HEIGHT,
            });
        }

        let mut board = Self::EMPTY;
        let top = BOARD_HEIGHT - lines.len();
        for (i, line) in lines.iter().enumerate() {
            let width = line.chars().count();
            if width != BOARD_WIDTH {
                return Err(BoardParseError::RowWidth {
                    row: i,
                    width,
                    expected: BOARD_WIDTH,
                });
            }
            for (x, ch) in line.chars().enumerate() {
                let block = match ch {
                    '.' => Block::Empty,
                    '#' => Block::Filled,
                    _ => ShapeKind::from_char(ch)
                        .map(Block::Piece)
                        .ok_or(BoardParseError::InvalidCell { row: i, ch })?,
                };
                board.rows[top + i].cells[x] = block;
            }
        }
        Ok(board)
    }
}

impl FromStr for Board {
    type Err = BoardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_ascii(s)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.rows.iter().enumerate() {
            if y > 0 {
                writeln!(f)?;
            }
            for block in row.cells {
                write!(f, "{}", block.as_char())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_row(board: &mut Board, y: usize) {
        for x in 0..BOARD_WIDTH {
            board.set_cell(x, y, Block::Filled);
        }
    }

    #[test]
    fn test_empty_board() {
        let board = Board::EMPTY;
        assert_eq!(board.occupied_count(), 0);
        for row in board.rows() {
            assert!(row.cells().iter().all(|b| b.is_empty()));
        }
    }

    #[test]
    fn test_is_valid_walls() {
        let board = Board::EMPTY;

        // Horizontal I: cells at dx 0..=3 on row dy 1
        let piece = Piece::new(ShapeKind::I, 0, 0);
        assert!(board.is_valid(&piece));
        assert!(!board.is_valid(&piece.left()));
        assert!(board.is_valid(&piece.with_position(6, 0)));
        assert!(!board.is_valid(&piece.with_position(7, 0)));

        // Bottom wall: row dy 1 must stay above row 20
        assert!(board.is_valid(&piece.with_position(0, 18)));
        assert!(!board.is_valid(&piece.with_position(0, 19)));
    }

    #[test]
    fn test_is_valid_allows_cells_above_the_board() {
        let board = Board::EMPTY;
        let piece = Piece::new(ShapeKind::I, 4, -3).with_rotation(1);
        assert!(board.is_valid(&piece));
    }

    #[test]
    fn test_is_valid_rejects_overlap() {
        let mut board = Board::EMPTY;
        board.set_cell(4, 19, Block::Filled);

        let square = Piece::new(ShapeKind::O, 3, 17);
        assert!(!board.is_valid(&square));
        assert!(board.is_valid(&square.moved(0, -1)));
    }

    #[test]
    fn test_lock_writes_marker() {
        let mut board = Board::EMPTY;
        let piece = Piece::new(ShapeKind::T, 0, 18);
        board.lock(&piece, piece.kind());

        assert_eq!(board.cell(1, 18), Block::Piece(ShapeKind::T));
        assert_eq!(board.cell(0, 19), Block::Piece(ShapeKind::T));
        assert_eq!(board.cell(1, 19), Block::Piece(ShapeKind::T));
        assert_eq!(board.cell(2, 19), Block::Piece(ShapeKind::T));
        assert_eq!(board.occupied_count(), 4);
    }

    #[test]
    fn test_lock_discards_cells_above_the_board() {
        let mut board = Board::EMPTY;
        let piece = Piece::new(ShapeKind::I, 0, -2).with_rotation(1);
        board.lock(&piece, Block::Filled);
        assert_eq!(board.occupied_count(), 2);
        assert!(board.is_occupied(1, 0));
        assert!(board.is_occupied(1, 1));
    }

    #[test]
    fn test_clear_full_rows_none() {
        let mut board = Board::from_ascii(
            r"
            #########.
            .#########
            ",
        )
        .unwrap();
        let before = board.clone();
        assert_eq!(board.clear_full_rows(), 0);
        assert_eq!(board, before);
    }

    #[test]
    fn test_clear_full_rows_single_bottom_row() {
        let mut board = Board::EMPTY;
        fill_row(&mut board, BOARD_HEIGHT - 1);
        board.set_cell(3, BOARD_HEIGHT - 2, Block::Filled);

        assert_eq!(board.clear_full_rows(), 1);
        assert_eq!(board.occupied_count(), 1);
        assert!(board.is_occupied(3, BOARD_HEIGHT - 1));
    }

    #[test]
    fn test_clear_full_rows_non_adjacent() {
        let mut board = Board::from_ascii(
            r"
            L.........
            ##########
            .J........
            ##########
            ..T.......
            ",
        )
        .unwrap();

        assert_eq!(board.clear_full_rows(), 2);
        let expected = Board::from_ascii(
            r"
            L.........
            .J........
            ..T.......
            ",
        )
        .unwrap();
        assert_eq!(board, expected);
    }

    #[test]
    fn test_clear_full_rows_all_filled() {
        let mut board = Board::EMPTY;
        for y in 0..BOARD_HEIGHT {
            fill_row(&mut board, y);
        }
        assert_eq!(board.clear_full_rows(), BOARD_HEIGHT);
        assert_eq!(board, Board::EMPTY);
    }

    #[test]
    fn test_from_ascii_aligns_to_bottom() {
        let board = Board::from_ascii("#.........").unwrap();
        assert!(board.is_occupied(0, BOARD_HEIGHT - 1));
        assert_eq!(board.occupied_count(), 1);
    }

    #[test]
    fn test_from_ascii_errors() {
        assert!(matches!(
            Board::from_ascii("#####"),
            Err(BoardParseError::RowWidth { width: 5, .. })
        ));
        assert!(matches!(
            Board::from_ascii("####x#####"),
            Err(BoardParseError::InvalidCell { ch: 'x', .. })
        ));
        let tall = "..........\n".repeat(BOARD_HEIGHT + 1);
        assert!(matches!(
            Board::from_ascii(&tall),
            Err(BoardParseError::TooManyRows { .. })
        ));
    }

    #[test]
    fn test_display_round_trip() {
        let board = Board::from_ascii(
            r"
            ....O.....
            #.IIII..S.
            ",
        )
        .unwrap();
        let text = board.to_string();
        assert_eq!(text.lines().count(), BOARD_HEIGHT);
        assert_eq!(text.lines().last(), Some("#.IIII..S."));
        assert_eq!(text.parse::<Board>().unwrap(), board);
    }
}
