//! Game board representation and collision detection
//!
//! The grid is `2 * visible_height` rows tall. Rows at or above `visible_height`
//! are the hidden buffer where pieces spawn.

use crate::tetromino::{Rotation, TetrominoType};
use thiserror::Error;

/// Standard board dimensions
pub const BOARD_WIDTH: usize = 10;
pub const VISIBLE_HEIGHT: usize = 20;

/// A cell on the board - either empty or filled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(TetrominoType),
    /// Filled by something other than a locked piece (test fixtures)
    Garbage,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_filled(&self) -> bool {
        !self.is_empty()
    }
}

/// Rejected board construction input
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("board must have at least one column and one visible row")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("{found} rows supplied but the board only holds {max}")]
    TooManyRows { found: usize, max: usize },
    #[error("unknown cell glyph {glyph:?} in row {row}")]
    UnknownGlyph { row: usize, glyph: char },
}

/// The game board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    visible_height: usize,
    /// Grid stored as [row][col], row 0 is bottom, row increases upward
    cells: Vec<Vec<Cell>>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(BOARD_WIDTH, VISIBLE_HEIGHT)
    }
}

impl Board {
    /// Create a new empty board with a hidden buffer as tall as the visible area
    pub fn new(width: usize, visible_height: usize) -> Self {
        Self {
            width,
            visible_height,
            cells: vec![vec![Cell::Empty; width]; visible_height * 2],
        }
    }

    /// Build a board from explicit rows, bottom row first.
    ///
    /// Missing rows up to `2 * visible_height` are filled with empty rows.
    pub fn from_rows(rows: Vec<Vec<Cell>>, width: usize, visible_height: usize) -> Result<Self, BoardError> {
        if width == 0 || visible_height == 0 {
            return Err(BoardError::Empty);
        }
        let height = visible_height * 2;
        if rows.len() > height {
            return Err(BoardError::TooManyRows {
                found: rows.len(),
                max: height,
            });
        }
        if let Some((row, cells)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(BoardError::RaggedRow {
                row,
                expected: width,
                found: cells.len(),
            });
        }

        let mut cells = rows;
        cells.resize(height, vec![Cell::Empty; width]);
        Ok(Self {
            width,
            visible_height,
            cells,
        })
    }

    /// Parse an ASCII picture, top row first.
    ///
    /// `█`, `#` and `X` are filled; `░`, `.`, `0` and space are empty. Leading
    /// and trailing blank lines and per-line indentation are ignored.
    pub fn parse(picture: &str, width: usize, visible_height: usize) -> Result<Self, BoardError> {
        let lines: Vec<&str> = picture
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let mut rows = Vec::with_capacity(lines.len());
        for (row, line) in lines.iter().rev().enumerate() {
            let cells = line
                .chars()
                .map(|glyph| match glyph {
                    '█' | '#' | 'X' => Ok(Cell::Garbage),
                    '░' | '.' | '0' | ' ' => Ok(Cell::Empty),
                    _ => Err(BoardError::UnknownGlyph { row, glyph }),
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(cells);
        }
        Self::from_rows(rows, width, visible_height)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn visible_height(&self) -> usize {
        self.visible_height
    }

    /// Total rows including the hidden buffer
    pub fn height(&self) -> usize {
        self.cells.len()
    }

    /// True if (row, col) addresses a materialized cell
    pub fn in_bounds(&self, row: i32, col: i32) -> bool {
        col >= 0 && (col as usize) < self.width && row >= 0 && (row as usize) < self.height()
    }

    /// Get the cell at a position (row, col)
    /// Returns None if out of bounds
    pub fn get(&self, row: i32, col: i32) -> Option<Cell> {
        if !self.in_bounds(row, col) {
            return None;
        }
        Some(self.cells[row as usize][col as usize])
    }

    /// Set a cell at a position
    /// Returns false if out of bounds
    pub fn set(&mut self, row: i32, col: i32, cell: Cell) -> bool {
        if !self.in_bounds(row, col) {
            return false;
        }
        self.cells[row as usize][col as usize] = cell;
        true
    }

    /// True if (row, col) is in bounds and empty
    pub fn is_open(&self, row: i32, col: i32) -> bool {
        self.get(row, col).is_some_and(|cell| cell.is_empty())
    }

    /// True if (row, col) is out of bounds or occupied
    pub fn is_blocked(&self, row: i32, col: i32) -> bool {
        !self.is_open(row, col)
    }

    /// Whether a piece could occupy this placement.
    ///
    /// This is the only placement legality check; moves, kicks, ground and ghost
    /// queries all go through it.
    pub fn cell_fits(&self, shape: TetrominoType, col: i32, row: i32, rotation: Rotation) -> bool {
        shape
            .cell_offsets(rotation)
            .iter()
            .all(|&(dr, dc)| self.is_open(row + dr, col + dc))
    }

    /// True if the piece could not move one row lower
    pub fn touches_ground(&self, shape: TetrominoType, col: i32, row: i32, rotation: Rotation) -> bool {
        !self.cell_fits(shape, col, row - 1, rotation)
    }

    /// True if any cell of the piece is in the hidden buffer
    pub fn touches_ceiling(&self, shape: TetrominoType, col: i32, row: i32, rotation: Rotation) -> bool {
        shape
            .cell_offsets(rotation)
            .iter()
            .any(|&(dr, _)| row + dr >= self.visible_height as i32)
    }

    /// Write the piece into the grid. Placement legality is the caller's job;
    /// cells outside the grid are skipped.
    pub fn lock_piece(&mut self, shape: TetrominoType, col: i32, row: i32, rotation: Rotation) {
        for (dr, dc) in shape.cell_offsets(rotation) {
            self.set(row + dr, col + dc, Cell::Filled(shape));
        }
    }

    /// Remove full rows, shift the rest down and refill the top.
    /// Returns the number of rows removed.
    pub fn clear_full_lines(&mut self) -> usize {
        let height = self.height();
        self.cells.retain(|row| !row.iter().all(Cell::is_filled));
        let cleared = height - self.cells.len();
        self.cells.resize(height, vec![Cell::Empty; self.width]);
        cleared
    }

    /// Check if the board is completely empty
    pub fn is_empty(&self) -> bool {
        self.cells
            .iter()
            .all(|row| row.iter().all(Cell::is_empty))
    }

    /// Visible rows (bottom to top)
    pub fn visible_rows(&self) -> &[Vec<Cell>] {
        &self.cells[..self.visible_height]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_count_invariant(board: &Board) {
        assert_eq!(board.height(), board.visible_height() * 2);
        assert!(board.cells.iter().all(|row| row.len() == board.width()));
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::default();
        assert!(board.is_empty());
        assert_eq!(board.height(), 40);
        assert_eq!(board.visible_rows().len(), 20);
    }

    #[test]
    fn test_set_and_get() {
        let mut board = Board::default();
        assert!(board.set(5, 5, Cell::Filled(TetrominoType::Z)));
        assert_eq!(board.get(5, 5), Some(Cell::Filled(TetrominoType::Z)));
    }

    #[test]
    fn test_out_of_bounds() {
        let board = Board::default();
        assert_eq!(board.get(-1, 0), None);
        assert_eq!(board.get(0, -1), None);
        assert_eq!(board.get(40, 0), None);
        assert_eq!(board.get(0, BOARD_WIDTH as i32), None);
        assert!(board.in_bounds(39, 9));
        assert!(board.is_blocked(-1, 4));
    }

    #[test]
    fn test_cell_fits_rejects_walls_and_blocks() {
        let board = Board::parse(".#........", 10, 20).unwrap();
        // T flat side down at the floor overlaps the block in column 1
        assert!(!board.cell_fits(TetrominoType::T, 0, -1, Rotation::North));
        assert!(board.cell_fits(TetrominoType::T, 2, -1, Rotation::North));
        assert!(!board.cell_fits(TetrominoType::T, -1, 0, Rotation::North));
        assert!(!board.cell_fits(TetrominoType::T, 8, 0, Rotation::North));
        assert!(board.cell_fits(TetrominoType::T, 7, 0, Rotation::North));
    }

    #[test]
    fn test_touches_ground_complements_fit_below() {
        let board = Board::parse(
            "
            ....#.....
            ##########
            ",
            10,
            20,
        )
        .unwrap();
        for shape in TetrominoType::all() {
            for rotation in Rotation::all() {
                for col in -2..10 {
                    for row in -1..6 {
                        assert_eq!(
                            board.touches_ground(shape, col, row, rotation),
                            !board.cell_fits(shape, col, row - 1, rotation)
                        );
                    }
                }
            }
        }
        // T flat on the filled floor row
        assert!(board.touches_ground(TetrominoType::T, 0, 0, Rotation::North));
        assert!(!board.touches_ground(TetrominoType::T, 0, 1, Rotation::North));
    }

    #[test]
    fn test_touches_ceiling() {
        let board = Board::default();
        // T spawn state has its flat row one above the box bottom
        assert!(!board.touches_ceiling(TetrominoType::T, 3, 17, Rotation::North));
        assert!(board.touches_ceiling(TetrominoType::T, 3, 18, Rotation::North));
        assert!(board.touches_ceiling(TetrominoType::T, 3, 20, Rotation::North));
    }

    #[test]
    fn test_touches_ceiling_entirely_in_hidden_buffer() {
        let board = Board::default();
        // Every cell above the first hidden row, none on it
        let rows: Vec<i32> = TetrominoType::T
            .cell_offsets(Rotation::North)
            .iter()
            .map(|&(dr, _)| 21 + dr)
            .collect();
        assert!(rows.iter().all(|&row| row > 20));
        assert!(board.touches_ceiling(TetrominoType::T, 3, 21, Rotation::North));
        // The O box has an empty bottom row, so row 20 puts its cells at 21..=22
        assert!(board.touches_ceiling(TetrominoType::O, 3, 20, Rotation::North));
    }

    #[test]
    fn test_lock_piece_writes_shape_tag() {
        let mut board = Board::default();
        board.lock_piece(TetrominoType::O, 0, -1, Rotation::North);
        assert_eq!(board.get(0, 1), Some(Cell::Filled(TetrominoType::O)));
        assert_eq!(board.get(1, 2), Some(Cell::Filled(TetrominoType::O)));
        assert_eq!(board.get(0, 0), Some(Cell::Empty));
    }

    #[test]
    fn test_clear_single_line() {
        let mut board = Board::default();
        for col in 0..BOARD_WIDTH as i32 {
            board.set(0, col, Cell::Garbage);
        }
        board.set(1, 0, Cell::Filled(TetrominoType::Z));

        let cleared = board.clear_full_lines();
        assert_eq!(cleared, 1);
        assert_eq!(board.get(0, 0), Some(Cell::Filled(TetrominoType::Z)));
        assert!(board.get(1, 0).unwrap().is_empty());
        row_count_invariant(&board);
    }

    #[test]
    fn test_clear_preserves_order_of_survivors() {
        let mut board = Board::parse(
            "
            ##########
            #.........
            ##########
            .#........
            ##########
            ",
            10,
            20,
        )
        .unwrap();
        assert_eq!(board.clear_full_lines(), 3);
        assert_eq!(board.get(0, 1), Some(Cell::Garbage));
        assert_eq!(board.get(1, 0), Some(Cell::Garbage));
        assert!(board.get(2, 0).unwrap().is_empty());
        row_count_invariant(&board);
    }

    #[test]
    fn test_clear_with_nothing_full_keeps_height() {
        let mut board = Board::parse("#.#.#.#.#.", 10, 20).unwrap();
        let before = board.clone();
        assert_eq!(board.clear_full_lines(), 0);
        assert_eq!(board, before);
        row_count_invariant(&board);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            Board::parse("###\n##", 3, 2),
            Err(BoardError::RaggedRow {
                row: 0,
                expected: 3,
                found: 2
            })
        );
        assert_eq!(
            Board::parse("#?#", 3, 2),
            Err(BoardError::UnknownGlyph { row: 0, glyph: '?' })
        );
        assert_eq!(
            Board::parse("#\n#\n#", 1, 1),
            Err(BoardError::TooManyRows { found: 3, max: 2 })
        );
        assert_eq!(Board::from_rows(Vec::new(), 0, 20), Err(BoardError::Empty));
    }

    #[test]
    fn test_parse_pads_to_full_height() {
        let board = Board::parse("██░███████", 10, 20).unwrap();
        row_count_invariant(&board);
        assert!(board.is_open(0, 2));
        assert!(board.is_blocked(0, 3));
    }
}
