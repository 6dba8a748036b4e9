//! Scoring, T-spin detection and level progression

use crate::board::Board;
use std::fmt;
use std::time::Duration;

/// Spin classification of a lock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinKind {
    None,
    /// Spin whose rotation needed a non-zero kick
    Mini,
    Full,
}

/// Type of lock for scoring and display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearKind {
    pub lines: usize,
    pub spin: SpinKind,
}

impl ClearKind {
    /// Points awarded at level 1
    pub fn base_points(&self) -> u64 {
        match (self.spin, self.lines) {
            (SpinKind::None, 1) => 100,
            (SpinKind::None, 2) => 300,
            (SpinKind::None, 3) => 500,
            (SpinKind::None, 4) => 800,
            (SpinKind::Mini, 0) => 100,
            (SpinKind::Mini, 1) => 200,
            (SpinKind::Mini, 2) => 400,
            (SpinKind::Full, 0) => 400,
            (SpinKind::Full, 1) => 800,
            (SpinKind::Full, 2) => 1200,
            (SpinKind::Full, 3) => 1600,
            _ => 0,
        }
    }

    /// Whether this lock is worth announcing
    pub fn is_notable(&self) -> bool {
        self.lines > 0 || self.spin != SpinKind::None
    }
}

impl fmt::Display for ClearKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let spin = match self.spin {
            SpinKind::None => "",
            SpinKind::Mini => "Mini T-Spin",
            SpinKind::Full => "T-Spin",
        };
        let lines = match self.lines {
            0 => "",
            1 => "Single",
            2 => "Double",
            3 => "Triple",
            _ => "Tetris",
        };
        match (spin.is_empty(), lines.is_empty()) {
            (true, true) => Ok(()),
            (true, false) => f.write_str(lines),
            (false, true) => f.write_str(spin),
            (false, false) => write!(f, "{} {}", spin, lines),
        }
    }
}

/// Count the diagonal corners of a 3x3 box that are out of bounds or occupied.
///
/// `row`/`col` is the bottom-left corner of the box.
pub fn corner_count(board: &Board, row: i32, col: i32) -> usize {
    [(0, 0), (0, 2), (2, 0), (2, 2)]
        .iter()
        .filter(|&&(dr, dc)| board.is_blocked(row + dr, col + dc))
        .count()
}

/// Classify a lock about to happen at (row, col).
///
/// A spin needs the last successful action to be a rotation and at least three
/// blocked corners; a kicked rotation makes it a mini spin.
pub fn detect_spin(board: &Board, row: i32, col: i32, rotated_last: bool, wall_kicked: bool) -> SpinKind {
    if !rotated_last || corner_count(board, row, col) < 3 {
        SpinKind::None
    } else if wall_kicked {
        SpinKind::Mini
    } else {
        SpinKind::Full
    }
}

/// Cumulative score needed to leave `level`: 500 * (1 + 2 + ... + level),
/// saturating at `u64::MAX`
pub fn level_goal(level: u32) -> u64 {
    let level = level as u64;
    // level * (level + 1) always fits in u64 for a u32 level
    (level * (level + 1) / 2).saturating_mul(500)
}

/// Seconds between gravity steps at `level`; exactly 1.0 at level 1
pub fn interval(level: u32) -> f64 {
    let steps = level.saturating_sub(1);
    (0.8 - steps as f64 * 0.007).powi(steps as i32)
}

/// Shortest gravity interval handed to the ticker, in seconds
const MIN_INTERVAL: f64 = 0.001;

/// `interval` as a `Duration` between one millisecond and one second.
///
/// Past the level where the base turns negative the curve grows again; those
/// levels run at the floor.
pub fn interval_duration(level: u32) -> Duration {
    let secs = interval(level).abs();
    let secs = if secs.is_finite() && secs <= 1.0 {
        secs.max(MIN_INTERVAL)
    } else {
        MIN_INTERVAL
    };
    Duration::from_secs_f64(secs)
}

/// Scoring state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Score {
    /// Current score
    pub points: u64,
    /// Current level
    pub level: u32,
    /// Total lines cleared
    pub lines: u32,
}

impl Default for Score {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Score {
    pub fn new(starting_level: u32) -> Self {
        Self {
            points: 0,
            level: starting_level.max(1),
            lines: 0,
        }
    }

    /// Add points for a lock and advance at most one level.
    /// Returns the points awarded and whether the level went up.
    pub fn add_clear(&mut self, clear: ClearKind) -> (u64, bool) {
        let awarded = clear.base_points() * self.level as u64;
        self.points = self.points.saturating_add(awarded);
        self.lines = self.lines.saturating_add(clear.lines as u32);

        let leveled = self.points >= level_goal(self.level) && self.level < u32::MAX;
        if leveled {
            self.level += 1;
        }
        (awarded, leveled)
    }

    /// Add score for soft drop (1 point per cell)
    pub fn add_soft_drop(&mut self, cells: u32) {
        self.points += cells as u64;
    }

    /// Add score for hard drop (2 points per cell)
    pub fn add_hard_drop(&mut self, cells: u32) {
        self.points += cells as u64 * 2;
    }
}
