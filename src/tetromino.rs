//! Tetromino definitions and shapes
//!
//! The seven SRS tetrominoes, each as four rotation matrices written top row
//! first. The engine reads every matrix bottom row first so that offset row 0 is
//! the lowest row of the piece's bounding box; ground and kick math rely on it.

use ratatui::style::Color;
use std::sync::OnceLock;

/// The 7 tetromino types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TetrominoType {
    I, // Cyan - long bar
    J, // Blue
    L, // Orange
    O, // Yellow - square
    S, // Green
    T, // Purple
    Z, // Red
}

type Matrix = &'static [&'static [u8]];

const I_MATRICES: [Matrix; 4] = [
    &[&[0, 0, 0, 0], &[1, 1, 1, 1], &[0, 0, 0, 0], &[0, 0, 0, 0]],
    &[&[0, 0, 1, 0], &[0, 0, 1, 0], &[0, 0, 1, 0], &[0, 0, 1, 0]],
    &[&[0, 0, 0, 0], &[0, 0, 0, 0], &[1, 1, 1, 1], &[0, 0, 0, 0]],
    &[&[0, 1, 0, 0], &[0, 1, 0, 0], &[0, 1, 0, 0], &[0, 1, 0, 0]],
];

const J_MATRICES: [Matrix; 4] = [
    &[&[1, 0, 0], &[1, 1, 1], &[0, 0, 0]],
    &[&[0, 1, 1], &[0, 1, 0], &[0, 1, 0]],
    &[&[0, 0, 0], &[1, 1, 1], &[0, 0, 1]],
    &[&[0, 1, 0], &[0, 1, 0], &[1, 1, 0]],
];

const L_MATRICES: [Matrix; 4] = [
    &[&[0, 0, 1], &[1, 1, 1], &[0, 0, 0]],
    &[&[0, 1, 0], &[0, 1, 0], &[0, 1, 1]],
    &[&[0, 0, 0], &[1, 1, 1], &[1, 0, 0]],
    &[&[1, 1, 0], &[0, 1, 0], &[0, 1, 0]],
];

// O never rotates; the 2x2 block sits in the middle of a 4x4 box.
const O_MATRIX: Matrix = &[&[0, 0, 0, 0], &[0, 1, 1, 0], &[0, 1, 1, 0], &[0, 0, 0, 0]];
const O_MATRICES: [Matrix; 4] = [O_MATRIX; 4];

const S_MATRICES: [Matrix; 4] = [
    &[&[0, 1, 1], &[1, 1, 0], &[0, 0, 0]],
    &[&[0, 1, 0], &[0, 1, 1], &[0, 0, 1]],
    &[&[0, 0, 0], &[0, 1, 1], &[1, 1, 0]],
    &[&[1, 0, 0], &[1, 1, 0], &[0, 1, 0]],
];

const T_MATRICES: [Matrix; 4] = [
    &[&[0, 1, 0], &[1, 1, 1], &[0, 0, 0]],
    &[&[0, 1, 0], &[0, 1, 1], &[0, 1, 0]],
    &[&[0, 0, 0], &[1, 1, 1], &[0, 1, 0]],
    &[&[0, 1, 0], &[1, 1, 0], &[0, 1, 0]],
];

const Z_MATRICES: [Matrix; 4] = [
    &[&[1, 1, 0], &[0, 1, 1], &[0, 0, 0]],
    &[&[0, 0, 1], &[0, 1, 1], &[0, 1, 0]],
    &[&[0, 0, 0], &[1, 1, 0], &[0, 1, 1]],
    &[&[0, 1, 0], &[1, 1, 0], &[1, 0, 0]],
];

/// Occupied cells of one rotation state, as (row_offset, col_offset) from the
/// bottom-left corner of the bounding box.
pub type CellOffsets = [(i32, i32); 4];

impl TetrominoType {
    /// Get the color for this tetromino
    pub fn color(&self) -> Color {
        match self {
            TetrominoType::I => Color::Cyan,
            TetrominoType::J => Color::Blue,
            TetrominoType::L => Color::Rgb(252, 171, 0),
            TetrominoType::O => Color::Yellow,
            TetrominoType::S => Color::Green,
            TetrominoType::T => Color::Rgb(154, 0, 254),
            TetrominoType::Z => Color::Red,
        }
    }

    /// Get all tetromino types for bag randomization
    pub fn all() -> [TetrominoType; 7] {
        [
            TetrominoType::I,
            TetrominoType::J,
            TetrominoType::L,
            TetrominoType::O,
            TetrominoType::S,
            TetrominoType::T,
            TetrominoType::Z,
        ]
    }

    fn index(&self) -> usize {
        match self {
            TetrominoType::I => 0,
            TetrominoType::J => 1,
            TetrominoType::L => 2,
            TetrominoType::O => 3,
            TetrominoType::S => 4,
            TetrominoType::T => 5,
            TetrominoType::Z => 6,
        }
    }

    fn matrices(&self) -> &'static [Matrix; 4] {
        match self {
            TetrominoType::I => &I_MATRICES,
            TetrominoType::J => &J_MATRICES,
            TetrominoType::L => &L_MATRICES,
            TetrominoType::O => &O_MATRICES,
            TetrominoType::S => &S_MATRICES,
            TetrominoType::T => &T_MATRICES,
            TetrominoType::Z => &Z_MATRICES,
        }
    }

    /// Width of the bounding box in columns
    pub fn width(&self) -> i32 {
        self.matrices()[0][0].len() as i32
    }

    /// Height of the bounding box in rows
    pub fn height(&self) -> i32 {
        self.matrices()[0].len() as i32
    }

    /// Occupied cells for a rotation state, bottom row first.
    ///
    /// Offsets are computed once per shape and rotation and cached.
    pub fn cell_offsets(&self, rotation: Rotation) -> CellOffsets {
        static TABLE: OnceLock<[[CellOffsets; 4]; 7]> = OnceLock::new();
        let table = TABLE.get_or_init(|| {
            let mut table = [[[(0, 0); 4]; 4]; 7];
            for shape in TetrominoType::all() {
                for rotation in Rotation::all() {
                    table[shape.index()][rotation.index()] = shape.compute_offsets(rotation);
                }
            }
            table
        });
        table[self.index()][rotation.index()]
    }

    fn compute_offsets(&self, rotation: Rotation) -> CellOffsets {
        let mut offsets = [(0, 0); 4];
        let mut filled = 0;
        for (row, line) in self.matrices()[rotation.index()].iter().rev().enumerate() {
            for (col, &cell) in line.iter().enumerate() {
                if cell != 0 {
                    offsets[filled] = (row as i32, col as i32);
                    filled += 1;
                }
            }
        }
        debug_assert_eq!(filled, 4, "every tetromino has four minos");
        offsets
    }
}

/// Rotation states (using SRS naming convention)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    #[default]
    North, // 0: spawn state
    East,  // 1: clockwise from North
    South, // 2: 180 from North
    West,  // 3: counter-clockwise from North
}

impl Rotation {
    pub fn all() -> [Rotation; 4] {
        [Rotation::North, Rotation::East, Rotation::South, Rotation::West]
    }

    /// Rotation index in 0..4
    pub fn index(&self) -> usize {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }

    /// Build a rotation from any integer, wrapping modulo 4 (never negative)
    pub fn from_index(index: i32) -> Rotation {
        match index.rem_euclid(4) {
            0 => Rotation::North,
            1 => Rotation::East,
            2 => Rotation::South,
            _ => Rotation::West,
        }
    }

    /// The rotation reached by turning once in `direction`
    pub fn rotate(&self, direction: RotationDirection) -> Rotation {
        Rotation::from_index(self.index() as i32 + direction.delta())
    }
}

/// Direction for rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

impl RotationDirection {
    /// +1 for clockwise, -1 for counter-clockwise
    pub fn delta(&self) -> i32 {
        match self {
            RotationDirection::Clockwise => 1,
            RotationDirection::CounterClockwise => -1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_state_has_four_cells() {
        for shape in TetrominoType::all() {
            for rotation in Rotation::all() {
                let offsets = shape.cell_offsets(rotation);
                let mut unique = offsets.to_vec();
                unique.sort();
                unique.dedup();
                assert_eq!(unique.len(), 4, "{:?} {:?}", shape, rotation);
            }
        }
    }

    #[test]
    fn test_offsets_are_bottom_up() {
        // T spawn state: flat row in the middle, nub on top
        let offsets = TetrominoType::T.cell_offsets(Rotation::North);
        assert_eq!(offsets, [(1, 0), (1, 1), (1, 2), (2, 1)]);

        // I spawn state sits on the third row from the bottom
        let offsets = TetrominoType::I.cell_offsets(Rotation::North);
        assert!(offsets.iter().all(|&(row, _)| row == 2));
    }

    #[test]
    fn test_o_is_centered_in_four_by_four() {
        assert_eq!(TetrominoType::O.width(), 4);
        assert_eq!(TetrominoType::O.height(), 4);
        for rotation in Rotation::all() {
            assert_eq!(
                TetrominoType::O.cell_offsets(rotation),
                [(1, 1), (1, 2), (2, 1), (2, 2)]
            );
        }
    }

    #[test]
    fn test_dimensions() {
        assert_eq!(TetrominoType::I.width(), 4);
        assert_eq!(TetrominoType::T.width(), 3);
        assert_eq!(TetrominoType::T.height(), 3);
    }

    #[test]
    fn test_rotation_wraps() {
        assert_eq!(Rotation::North.rotate(RotationDirection::CounterClockwise), Rotation::West);
        assert_eq!(Rotation::West.rotate(RotationDirection::Clockwise), Rotation::North);
        assert_eq!(Rotation::from_index(-1), Rotation::West);
        assert_eq!(Rotation::from_index(6), Rotation::South);
    }
}
