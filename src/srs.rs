//! Super Rotation System (SRS) wall kick data
//!
//! When a rotation would collide, these offsets are tried in order and the first
//! one that fits wins. Offsets are (column_offset, row_offset) with row up.
//! Tables are indexed by the rotation being left and the turn direction, which
//! covers every (from, to) pair a single turn can produce.

use crate::tetromino::{Rotation, RotationDirection, TetrominoType};

/// A single kick candidate: (column_offset, row_offset)
pub type Kick = (i32, i32);

/// Ordered candidates for one rotation transition; the first is always (0, 0)
pub type KickList = [Kick; 5];

// [from][0] = clockwise, [from][1] = counter-clockwise
const JLSTZ_KICKS: [[KickList; 2]; 4] = [
    [
        // 0 -> R
        [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
        // 0 -> L
        [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    ],
    [
        // R -> 2
        [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
        // R -> 0
        [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    ],
    [
        // 2 -> L
        [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
        // 2 -> R
        [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    ],
    [
        // L -> 0
        [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
        // L -> 2
        [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    ],
];

const I_KICKS: [[KickList; 2]; 4] = [
    [
        // 0 -> R
        [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
        // 0 -> L
        [(0, 0), (-1, 0), (2, 0), (-1, -2), (2, -1)],
    ],
    [
        // R -> 2
        [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
        // R -> 0
        [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    ],
    [
        // 2 -> L
        [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
        // 2 -> R
        [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
    ],
    [
        // L -> 0
        [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
        // L -> 2
        [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    ],
];

// O never rotates; callers short-circuit before asking, but the lookup stays total.
const IDENTITY_KICKS: KickList = [(0, 0); 5];

/// Get wall kick offsets for a rotation attempt
pub fn get_wall_kicks(
    piece_type: TetrominoType,
    from: Rotation,
    direction: RotationDirection,
) -> &'static KickList {
    let turn = match direction {
        RotationDirection::Clockwise => 0,
        RotationDirection::CounterClockwise => 1,
    };
    match piece_type {
        TetrominoType::O => &IDENTITY_KICKS,
        TetrominoType::I => &I_KICKS[from.index()][turn],
        _ => &JLSTZ_KICKS[from.index()][turn],
    }
}
