//! PGN Board Replay Library
//!
//! This library replays the movetext of a PGN game onto a chess board and
//! hands back the final position. Moves are resolved from their algebraic
//! notation alone: no legality or check verification is performed.

pub mod board;
pub mod error;
pub mod pgn;

pub use board::{Board, Color, Piece, PieceKind, Snapshot, Square};
pub use error::{BoardError, MoveError, ReplayError, TokenizeError};
pub use pgn::{GameReplayer, ReplayReport};

/// Replay movetext from the starting position with default settings
pub fn replay(movetext: &str) -> Result<Board, ReplayError> {
    GameReplayer::new().replay(movetext).map(|report| report.board)
}
