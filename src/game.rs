//! Core game state and logic
//!
//! `Game` owns the board, the active piece, the bag and the score. Every action
//! is a synchronous state transition that reports whether anything changed, so
//! the caller knows when to redraw. Illegal moves are silently rejected.

use crate::bag::Bag;
use crate::board::{BOARD_WIDTH, Board, VISIBLE_HEIGHT};
use crate::piece::Piece;
use crate::score::{self, ClearKind, Score, detect_spin};
use crate::tetromino::{RotationDirection, TetrominoType};
use tracing::{debug, info};

/// Game state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Playing,
    Paused,
    GameOver,
}

/// The last successful action applied to the active piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LastMovement {
    #[default]
    None,
    Move,
    Rotate,
    Down,
}

/// Input actions the game can process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    RotateCW,
    RotateCCW,
    SoftDrop,
    HardDrop,
    Pause,
    Gravity,
}

/// Session parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub width: usize,
    pub visible_height: usize,
    pub starting_level: u32,
    /// Fixed bag seed; random when `None`
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            visible_height: VISIBLE_HEIGHT,
            starting_level: 1,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DropKind {
    Gravity,
    Soft,
    Hard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Moved,
    Locked,
}

/// The main game struct
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    current_piece: Piece,
    next_shape: TetrominoType,
    bag: Bag,
    score: Score,
    state: GameState,
    last_movement: LastMovement,
    /// Whether the last successful rotation needed a non-zero kick
    wall_kicked: bool,
    last_clear: Option<ClearKind>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        let bag = config.seed.map_or_else(Bag::new, Bag::with_seed);
        Self::from_parts(
            Board::new(config.width, config.visible_height),
            bag,
            Score::new(config.starting_level),
        )
    }

    /// Create a level-1 game on an empty standard board with a fixed seed
    pub fn with_seed(seed: u64) -> Self {
        Self::with_board(Board::default(), seed)
    }

    /// Create a level-1 game on a prepared board
    pub fn with_board(board: Board, seed: u64) -> Self {
        Self::from_parts(board, Bag::with_seed(seed), Score::new(1))
    }

    fn from_parts(board: Board, mut bag: Bag, score: Score) -> Self {
        let first = bag.next_shape();
        let next_shape = bag.next_shape();
        let mut game = Self {
            current_piece: Piece::spawn(first, &board),
            board,
            next_shape,
            bag,
            score,
            state: GameState::Playing,
            last_movement: LastMovement::None,
            wall_kicked: false,
            last_clear: None,
        };
        game.check_spawn();
        game
    }

    /// Replace the active piece, e.g. to set up a position in a test harness.
    /// Spin tracking starts fresh.
    pub fn set_active(&mut self, piece: Piece) {
        self.current_piece = piece;
        self.last_movement = LastMovement::None;
        self.wall_kicked = false;
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> &Piece {
        &self.current_piece
    }

    /// Lowest row the active piece could drop to
    pub fn ghost_row(&self) -> i32 {
        self.current_piece.ghost_row(&self.board)
    }

    pub fn next_shape(&self) -> TetrominoType {
        self.next_shape
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    pub fn points(&self) -> u64 {
        self.score.points
    }

    pub fn level(&self) -> u32 {
        self.score.level
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.state == GameState::Paused
    }

    pub fn is_game_over(&self) -> bool {
        self.state == GameState::GameOver
    }

    pub fn last_movement(&self) -> LastMovement {
        self.last_movement
    }

    pub fn wall_kicked(&self) -> bool {
        self.wall_kicked
    }

    /// Classification of the most recent lock that cleared lines or spun
    pub fn last_clear(&self) -> Option<ClearKind> {
        self.last_clear
    }

    /// Seconds until the next gravity step at the current level
    pub fn interval(&self) -> f64 {
        score::interval(self.score.level)
    }

    /// Process an action; returns true if the game changed
    pub fn process_action(&mut self, action: Action) -> bool {
        match action {
            Action::MoveLeft => self.move_left(),
            Action::MoveRight => self.move_right(),
            Action::RotateCW => self.rotate_cw(),
            Action::RotateCCW => self.rotate_ccw(),
            Action::SoftDrop => self.soft_drop_step(),
            Action::HardDrop => self.hard_drop(),
            Action::Pause => self.pause_toggle(),
            Action::Gravity => self.gravity_tick(),
        }
    }

    fn is_playing(&self) -> bool {
        self.state == GameState::Playing
    }

    pub fn move_left(&mut self) -> bool {
        self.shift(-1)
    }

    pub fn move_right(&mut self) -> bool {
        self.shift(1)
    }

    fn shift(&mut self, dcol: i32) -> bool {
        if !self.is_playing() || !self.current_piece.shift(dcol, &self.board) {
            return false;
        }
        self.last_movement = LastMovement::Move;
        true
    }

    pub fn rotate_cw(&mut self) -> bool {
        self.rotate(RotationDirection::Clockwise)
    }

    pub fn rotate_ccw(&mut self) -> bool {
        self.rotate(RotationDirection::CounterClockwise)
    }

    /// Rotate with wall kicks. A failed rotation changes nothing, including the
    /// spin tracking.
    pub fn rotate(&mut self, direction: RotationDirection) -> bool {
        if !self.is_playing() {
            return false;
        }
        let Some(outcome) = self.current_piece.rotate(direction, &self.board) else {
            return false;
        };
        self.last_movement = LastMovement::Rotate;
        self.wall_kicked = outcome.wall_kicked();
        if outcome.wall_kicked() {
            debug!(
                "{:?} kicked with offset #{} into {:?}",
                self.current_piece.piece_type, outcome.kick_index, self.current_piece.rotation
            );
        }
        true
    }

    /// Player-initiated one-row drop (1 point per row); locks when grounded
    pub fn soft_drop_step(&mut self) -> bool {
        if !self.is_playing() {
            return false;
        }
        self.step_down(DropKind::Soft);
        true
    }

    /// Automatic one-row drop; locks when grounded
    pub fn gravity_tick(&mut self) -> bool {
        if !self.is_playing() {
            return false;
        }
        self.step_down(DropKind::Gravity);
        true
    }

    /// Drop until the piece locks (2 points per row)
    pub fn hard_drop(&mut self) -> bool {
        if !self.is_playing() {
            return false;
        }
        let mut rows = 0;
        while self.step_down(DropKind::Hard) == Step::Moved {
            rows += 1;
        }
        debug!("hard drop fell {} rows", rows);
        true
    }

    /// Toggle pause; has no effect once the game is over
    pub fn pause_toggle(&mut self) -> bool {
        self.state = match self.state {
            GameState::Playing => GameState::Paused,
            GameState::Paused => GameState::Playing,
            GameState::GameOver => return false,
        };
        debug!("pause toggled, now {:?}", self.state);
        true
    }

    fn step_down(&mut self, kind: DropKind) -> Step {
        if self.current_piece.touches_ground(&self.board) {
            self.lock_piece();
            return Step::Locked;
        }
        self.current_piece.row -= 1;
        self.last_movement = LastMovement::Down;
        match kind {
            DropKind::Gravity => {}
            DropKind::Soft => self.score.add_soft_drop(1),
            DropKind::Hard => self.score.add_hard_drop(1),
        }
        Step::Moved
    }

    /// Lock the current piece, score it and spawn the next one
    fn lock_piece(&mut self) {
        let piece = self.current_piece;

        // Spin detection looks at the board before this piece is written
        let spin = detect_spin(
            &self.board,
            piece.row,
            piece.col,
            self.last_movement == LastMovement::Rotate,
            self.wall_kicked,
        );

        self.board
            .lock_piece(piece.piece_type, piece.col, piece.row, piece.rotation);
        let lines = self.board.clear_full_lines();
        let clear = ClearKind { lines, spin };
        let (awarded, leveled) = self.score.add_clear(clear);
        self.last_clear = clear.is_notable().then_some(clear);

        debug!(
            "locked {:?} at col={} row={} rot={:?}: {} lines, {:?}, +{}",
            piece.piece_type, piece.col, piece.row, piece.rotation, lines, spin, awarded
        );
        if lines > 0 && self.board.is_empty() {
            info!("perfect clear with {:?}", piece.piece_type);
        }
        if leveled {
            info!("level up to {} at {} points", self.score.level, self.score.points);
        }

        if piece.touches_ceiling(&self.board) {
            info!("locked above the visible field, game over at {} points", self.score.points);
            self.state = GameState::GameOver;
        }

        self.spawn();
    }

    /// Pull the queued shape into play and draw a new one
    fn spawn(&mut self) {
        let shape = std::mem::replace(&mut self.next_shape, self.bag.next_shape());
        self.current_piece = Piece::spawn(shape, &self.board);
        self.last_movement = LastMovement::None;
        self.wall_kicked = false;
        debug!(
            "spawned {:?}, next {:?}, {} left in bag",
            shape,
            self.next_shape,
            self.bag.remaining().len()
        );
        self.check_spawn();
    }

    fn check_spawn(&mut self) {
        if !self.current_piece.fits(&self.board) && self.state != GameState::GameOver {
            info!(
                "{:?} cannot spawn, game over at {} points",
                self.current_piece.piece_type, self.score.points
            );
            self.state = GameState::GameOver;
        }
    }
}
