use tracing::{debug, info, warn};

use super::normalizer::{normalize_pairs, MovePair};
use super::tokenizer::tokenize;
use crate::board::{AppliedMove, Board, Color, MoveResolver};
use crate::error::{MoveError, ReplayError};

/// A half-move that best-effort replay could not apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedMove {
    pub number: usize,
    pub color: Color,
    pub token: String,
    pub error: MoveError,
}

/// Outcome of a replay: the final board plus what happened on the way
#[derive(Debug, Clone)]
pub struct ReplayReport {
    pub board: Board,
    pub applied: Vec<AppliedMove>,
    pub skipped: Vec<SkippedMove>,
}

/// Replays PGN movetext onto a board, white then black for every move pair
#[derive(Debug, Clone, Copy, Default)]
pub struct GameReplayer {
    resolver: MoveResolver,
    best_effort: bool,
}

impl GameReplayer {
    pub fn new() -> Self {
        GameReplayer {
            resolver: MoveResolver::new(),
            best_effort: false,
        }
    }

    /// Skip half-moves that cannot be resolved instead of stopping
    pub fn with_best_effort(mut self, best_effort: bool) -> Self {
        self.best_effort = best_effort;
        self
    }

    pub fn with_reject_ambiguous(mut self, reject: bool) -> Self {
        self.resolver = self.resolver.with_reject_ambiguous(reject);
        self
    }

    /// Replay a full movetext from the starting position
    pub fn replay(&self, movetext: &str) -> Result<ReplayReport, ReplayError> {
        let segments = tokenize(movetext)?;
        let pairs = normalize_pairs(&segments)?;
        self.replay_pairs(Board::initialize(), &pairs)
    }

    /// Replay already normalized move pairs onto `board`
    pub fn replay_pairs(
        &self,
        mut board: Board,
        pairs: &[MovePair],
    ) -> Result<ReplayReport, ReplayError> {
        let mut applied = Vec::with_capacity(pairs.len() * 2);
        let mut skipped = Vec::new();

        for (index, pair) in pairs.iter().enumerate() {
            let number = index + 1;
            let half_moves = std::iter::once((Color::White, &pair.white))
                .chain(pair.black.as_ref().map(|black| (Color::Black, black)));

            for (color, token) in half_moves {
                match self.resolver.apply(&mut board, token, color) {
                    Ok(mv) => applied.push(mv),
                    Err(error) if self.best_effort && error.is_recoverable() => {
                        warn!(number, %color, token = token.as_str(), %error, "skipping half-move");
                        skipped.push(SkippedMove {
                            number,
                            color,
                            token: token.clone(),
                            error,
                        });
                    }
                    Err(source) => {
                        debug!(number, %color, token = token.as_str(), "replay stopped");
                        return Err(ReplayError::Move {
                            number,
                            color,
                            token: token.clone(),
                            source,
                        });
                    }
                }
            }
        }

        info!(
            moves = pairs.len(),
            applied = applied.len(),
            skipped = skipped.len(),
            "replay finished"
        );
        Ok(ReplayReport {
            board,
            applied,
            skipped,
        })
    }
}
