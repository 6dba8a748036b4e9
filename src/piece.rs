//! Active falling piece logic and SRS rotation

use crate::board::Board;
use crate::srs::get_wall_kicks;
use crate::tetromino::{Rotation, RotationDirection, TetrominoType};

/// An active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    /// The type of tetromino
    pub piece_type: TetrominoType,
    /// Current rotation state
    pub rotation: Rotation,
    /// Leftmost column of the bounding box
    pub col: i32,
    /// Bottom row of the bounding box (row 0 is the floor)
    pub row: i32,
}

/// A successful rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationOutcome {
    /// Index into the kick list of the accepted offset; 0 means no kick
    pub kick_index: usize,
}

impl RotationOutcome {
    pub fn wall_kicked(&self) -> bool {
        self.kick_index != 0
    }
}

impl Piece {
    /// Create a piece at the spawn position: horizontally centered, bottom of the
    /// bounding box on the first hidden row
    pub fn spawn(piece_type: TetrominoType, board: &Board) -> Self {
        let col = (board.width() as i32 - piece_type.width()).div_euclid(2);
        Self {
            piece_type,
            rotation: Rotation::North,
            col,
            row: board.visible_height() as i32,
        }
    }

    /// Get the absolute (row, col) positions of all 4 blocks
    pub fn block_positions(&self) -> [(i32, i32); 4] {
        self.piece_type
            .cell_offsets(self.rotation)
            .map(|(dr, dc)| (self.row + dr, self.col + dc))
    }

    pub fn fits(&self, board: &Board) -> bool {
        board.cell_fits(self.piece_type, self.col, self.row, self.rotation)
    }

    pub fn touches_ground(&self, board: &Board) -> bool {
        board.touches_ground(self.piece_type, self.col, self.row, self.rotation)
    }

    pub fn touches_ceiling(&self, board: &Board) -> bool {
        board.touches_ceiling(self.piece_type, self.col, self.row, self.rotation)
    }

    /// Shift by one column if the target placement fits; returns true if moved
    pub fn shift(&mut self, dcol: i32, board: &Board) -> bool {
        if board.cell_fits(self.piece_type, self.col + dcol, self.row, self.rotation) {
            self.col += dcol;
            true
        } else {
            false
        }
    }

    /// Try to rotate, using SRS wall kicks.
    ///
    /// The first kick offset that fits is taken. When none fits the piece is left
    /// untouched and `None` is returned.
    pub fn rotate(&mut self, direction: RotationDirection, board: &Board) -> Option<RotationOutcome> {
        if self.piece_type == TetrominoType::O {
            return None;
        }

        let next = self.rotation.rotate(direction);
        let kicks = get_wall_kicks(self.piece_type, self.rotation, direction);

        let (kick_index, &(dcol, drow)) = kicks
            .iter()
            .enumerate()
            .find(|&(_, &(dcol, drow))| board.cell_fits(self.piece_type, self.col + dcol, self.row + drow, next))?;

        self.rotation = next;
        self.col += dcol;
        self.row += drow;
        Some(RotationOutcome { kick_index })
    }

    /// Get the ghost piece position (where the piece would land)
    pub fn ghost_row(&self, board: &Board) -> i32 {
        let mut ghost_row = self.row;
        while !board.touches_ground(self.piece_type, self.col, ghost_row, self.rotation) {
            ghost_row -= 1;
        }
        ghost_row
    }
}
