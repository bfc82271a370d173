/// Move resolution: from a notation token to a board mutation
///
/// Given a canonical token and the side to move, the resolver finds the one
/// square the moving piece must come from and applies the move to the board.
/// Candidates are taken from the piece index in bucket order and filtered by
/// disambiguation hints and by movement geometry. Geometry is deliberately
/// coarse: paths are not checked for blockers and check is never considered,
/// so the notation itself is trusted to be unambiguous.
use tracing::{debug, warn};

use super::moves::{CastleSide, MoveToken, PieceMove};
use super::position::{Board, Color, Piece, PieceKind, Square};
use crate::error::MoveError;

/// What a resolved half-move did to the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMove {
    pub piece: Piece,
    pub from: Square,
    pub to: Square,
    /// Captured piece and the square it was taken on (differs from `to` en passant)
    pub captured: Option<(Piece, Square)>,
    pub promoted_to: Option<PieceKind>,
    /// Rook origin and destination when castling
    pub rook: Option<(Square, Square)>,
}

/// Resolves canonical tokens against a board
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveResolver {
    reject_ambiguous: bool,
}

impl MoveResolver {
    pub fn new() -> Self {
        MoveResolver {
            reject_ambiguous: false,
        }
    }

    /// Report `AmbiguousMove` instead of taking the first candidate in index order
    pub fn with_reject_ambiguous(mut self, reject: bool) -> Self {
        self.reject_ambiguous = reject;
        self
    }

    /// Resolve `token` for `color` and apply it to `board`
    ///
    /// On error the board is left untouched unless the error is a
    /// `MoveError::Board`, which signals a broken board invariant.
    pub fn apply(
        &self,
        board: &mut Board,
        token: &str,
        color: Color,
    ) -> Result<AppliedMove, MoveError> {
        let applied = match MoveToken::parse(token, color)? {
            MoveToken::Castle { color, side } => self.castle(board, token, color, side)?,
            MoveToken::Piece(mv) => self.piece_move(board, token, &mv)?,
        };

        debug!(
            token,
            piece = %applied.piece,
            from = %applied.from,
            to = %applied.to,
            "resolved half-move"
        );
        Ok(applied)
    }

    fn castle(
        &self,
        board: &mut Board,
        token: &str,
        color: Color,
        side: CastleSide,
    ) -> Result<AppliedMove, MoveError> {
        let king = Piece::new(PieceKind::King, color);
        let rook = Piece::new(PieceKind::Rook, color);

        let king_from = board.find_king(color).ok_or_else(|| MoveError::UnresolvedMove {
            token: token.to_string(),
            reason: format!("no {} on the board", king),
        })?;

        // The castling rook is the outermost rook on the king's rank, on the castling side
        let on_side = |square: &&Square| {
            square.rank() == king_from.rank()
                && match side {
                    CastleSide::Kingside => square.file() > king_from.file(),
                    CastleSide::Queenside => square.file() < king_from.file(),
                }
        };
        let rooks = board.squares_of(rook).iter().filter(on_side);
        let rook_from = match side {
            CastleSide::Kingside => rooks.max_by_key(|square| square.file()),
            CastleSide::Queenside => rooks.min_by_key(|square| square.file()),
        }
        .copied()
        .ok_or_else(|| MoveError::UnresolvedMove {
            token: token.to_string(),
            reason: format!("no {} to castle with on the {:?}", rook, side),
        })?;

        let (king_file, rook_file) = side.target_files();
        let king_to = Square(king_from.rank() * 8 + king_file);
        let rook_to = Square(king_from.rank() * 8 + rook_file);

        let vacated = [king_from, rook_from];
        if let Some(blocker) = [king_to, rook_to]
            .into_iter()
            .find(|square| !vacated.contains(square) && board.piece_at(*square).is_some())
        {
            return Err(MoveError::UnresolvedMove {
                token: token.to_string(),
                reason: format!("castling destination {} is occupied", blocker),
            });
        }

        board.relocate(king, king_from, king_to)?;
        board.relocate(rook, rook_from, rook_to)?;

        Ok(AppliedMove {
            piece: king,
            from: king_from,
            to: king_to,
            captured: None,
            promoted_to: None,
            rook: Some((rook_from, rook_to)),
        })
    }

    fn piece_move(
        &self,
        board: &mut Board,
        token: &str,
        mv: &PieceMove,
    ) -> Result<AppliedMove, MoveError> {
        let candidates: Vec<Square> = board
            .squares_of(mv.piece)
            .iter()
            .copied()
            .filter(|square| mv.matches_hint(*square))
            .filter(|square| can_reach(mv.piece, *square, mv.to, mv.capture))
            .filter(|square| !double_step_blocked(board, mv, *square))
            .collect();

        let from = match candidates.as_slice() {
            [] => {
                return Err(MoveError::UnresolvedMove {
                    token: token.to_string(),
                    reason: format!("no {} can reach {}", mv.piece, mv.to),
                })
            }
            [only] => *only,
            [first, ..] if !self.reject_ambiguous => *first,
            _ => {
                return Err(MoveError::AmbiguousMove {
                    token: token.to_string(),
                    candidates,
                })
            }
        };

        let en_passant = self.en_passant_victim(board, token, mv, from)?;
        let last_rank = mv.to.rank() == mv.piece.color.promotion_rank();
        if mv.promotion.is_some() && !last_rank {
            return Err(MoveError::UnresolvedMove {
                token: token.to_string(),
                reason: format!("promotion on {} is not on the last rank", mv.to),
            });
        }
        if mv.promotion.is_none() && mv.piece.kind == PieceKind::Pawn && last_rank {
            warn!(token, "pawn reached the last rank without a promotion piece");
        }

        let mut captured = board.relocate(mv.piece, from, mv.to)?.map(|piece| (piece, mv.to));
        if let Some(square) = en_passant {
            captured = board.remove(square).map(|piece| (piece, square));
        }
        if let Some(kind) = mv.promotion {
            board.promote(mv.to, kind)?;
        }

        Ok(AppliedMove {
            piece: mv.piece,
            from,
            to: mv.to,
            captured,
            promoted_to: mv.promotion,
            rook: None,
        })
    }

    /// Square of the pawn taken en passant, if this is an en passant capture
    fn en_passant_victim(
        &self,
        board: &Board,
        token: &str,
        mv: &PieceMove,
        from: Square,
    ) -> Result<Option<Square>, MoveError> {
        if mv.piece.kind != PieceKind::Pawn || !mv.capture || board.piece_at(mv.to).is_some() {
            return Ok(None);
        }

        let victim = Square(from.rank() * 8 + mv.to.file());
        let enemy_pawn = Piece::new(PieceKind::Pawn, mv.piece.color.opposite());
        if board.piece_at(victim) == Some(enemy_pawn) {
            Ok(Some(victim))
        } else {
            Err(MoveError::UnresolvedMove {
                token: token.to_string(),
                reason: format!("nothing to capture on {}", mv.to),
            })
        }
    }
}

/// A pawn cannot advance two squares through an occupied square
fn double_step_blocked(board: &Board, mv: &PieceMove, from: Square) -> bool {
    if mv.piece.kind != PieceKind::Pawn || mv.capture || from.delta(mv.to) != (0, 2) {
        return false;
    }
    let passed = Square((from.rank() + mv.to.rank()) / 2 * 8 + from.file());
    board.piece_at(passed).is_some()
}

/// Movement geometry on absolute file and rank distance
pub fn can_reach(piece: Piece, from: Square, to: Square, capture: bool) -> bool {
    let moved_by = from.delta(to);
    if moved_by == (0, 0) {
        return false;
    }

    let rook_like = moved_by.0 == 0 || moved_by.1 == 0;
    let bishop_like = moved_by.0 == moved_by.1;

    match piece.kind {
        PieceKind::Rook => rook_like,
        PieceKind::Bishop => bishop_like,
        PieceKind::Queen => rook_like || bishop_like,
        PieceKind::Knight => matches!(moved_by, (1, 2) | (2, 1)),
        PieceKind::King => matches!(moved_by, (0, 1) | (1, 0) | (1, 1)),
        PieceKind::Pawn if capture => moved_by == (1, 1),
        PieceKind::Pawn if from.rank() == piece.color.pawn_rank() => {
            matches!(moved_by, (0, 1) | (0, 2))
        }
        PieceKind::Pawn => moved_by == (0, 1),
    }
}
