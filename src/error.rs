//! Error types for movetext parsing and board replay
//!
//! Parsing-stage errors (`TokenizeError`) abort the whole replay. Resolution-stage
//! errors (`MoveError`) belong to a single half-move and are wrapped into
//! `ReplayError::Move` together with the ply that produced them.

use thiserror::Error;

use crate::board::{Color, Piece, Square};

/// Errors raised while splitting raw movetext into half-moves
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenizeError {
    /// A comment or tag delimiter without its partner
    #[error("Unbalanced '{open}{close}' delimiter at byte {position}")]
    UnbalancedDelimiter {
        open: char,
        close: char,
        position: usize,
    },

    /// Something that looks like a game result but is not one of the known markers
    #[error("Unparsable result marker: {0}")]
    MalformedResult(String),

    /// A numbered segment that does not hold a white and (optionally) a black half-move
    #[error("Malformed move pair #{index}: '{segment}'")]
    MalformedMovePair { index: usize, segment: String },
}

/// Violations of the board's own consistency guards
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Origin square does not hold the piece the caller asked to move
    #[error("Illegal relocation: no {piece} on {from}")]
    IllegalRelocation { piece: Piece, from: Square },

    /// Destination holds a piece of the mover's own colour
    #[error("Illegal relocation: {square} is occupied by own {piece}")]
    OwnPieceCaptured { piece: Piece, square: Square },

    #[error("Illegal promotion on {square}: {reason}")]
    IllegalPromotion { square: Square, reason: String },
}

/// Errors raised while resolving a single half-move against the board
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error("Malformed move token '{token}': {reason}")]
    MalformedToken { token: String, reason: String },

    /// No piece on the board can make the move
    #[error("Unresolved move '{token}': {reason}")]
    UnresolvedMove { token: String, reason: String },

    /// More than one piece can make the move and ambiguity is rejected
    #[error("Ambiguous move '{token}': candidates {}", format_squares(.candidates))]
    AmbiguousMove {
        token: String,
        candidates: Vec<Square>,
    },

    #[error(transparent)]
    Board(#[from] BoardError),
}

impl MoveError {
    /// Whether best-effort replay may skip this error and continue
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, MoveError::Board(_))
    }
}

/// Top-level error for a full game replay
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReplayError {
    #[error("Failed to tokenize movetext: {0}")]
    Tokenize(#[from] TokenizeError),

    #[error("Move {number} ({color}) '{token}' failed: {source}")]
    Move {
        number: usize,
        color: Color,
        token: String,
        #[source]
        source: MoveError,
    },
}

fn format_squares(squares: &[Square]) -> String {
    squares
        .iter()
        .map(|square| square.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
