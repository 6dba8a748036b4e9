//! SRSTRIS - falling-block puzzle engine built on the Standard Rotation System
//!
//! The engine (`board`, `piece`, `srs`, `score`, `bag`, `game`) does no terminal
//! I/O; `input`, `ui` and `runtime` form the crossterm/ratatui front-end.

pub mod bag;
pub mod board;
pub mod game;
pub mod input;
pub mod piece;
pub mod runtime;
pub mod score;
pub mod settings;
pub mod srs;
pub mod tetromino;
pub mod ui;

pub use board::{Board, BoardError, Cell};
pub use game::{Action, Game, GameConfig, GameState, LastMovement};
pub use piece::Piece;
pub use score::{ClearKind, Score, SpinKind};
pub use tetromino::{Rotation, RotationDirection, TetrominoType};
