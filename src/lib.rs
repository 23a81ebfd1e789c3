//! BLOCKFALL - a falling-block puzzle game
//!
//! The library is the simulation core: a bitmask board, the falling piece,
//! and the tick-driven game state machine. The terminal front-end lives in
//! the binary.

pub mod board;
pub mod error;
pub mod game;
pub mod piece;
pub mod row;
pub mod rows;
pub mod score;
pub mod settings;
pub mod spawn;
pub mod tetromino;

pub use board::{Board, Placement};
pub use error::{EngineError, Result};
pub use game::{Game, GameState, Intent};
pub use piece::Piece;
pub use row::{Color, Row};
pub use rows::RowSequence;
pub use score::HighScore;
pub use settings::Settings;
pub use spawn::Spawner;
pub use tetromino::TetrominoType;
