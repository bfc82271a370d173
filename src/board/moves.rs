/// Half-move tokens in canonical algebraic notation
///
/// A canonical token always starts with a piece letter whose case carries the
/// colour (`Pe4`, `nbd7`, `pexd5`). Parsing turns that letter back into a
/// first-class `Piece` and splits the rest into hints, capture flag,
/// destination and promotion.
use super::position::{file_index, rank_index, Color, Piece, PieceKind, Square};
use crate::error::MoveError;

/// Which side of the board the king castles towards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastleSide {
    Kingside,
    Queenside,
}

impl CastleSide {
    /// Destination files for (king, rook)
    pub fn target_files(self) -> (u8, u8) {
        match self {
            CastleSide::Kingside => (6, 5),
            CastleSide::Queenside => (2, 3),
        }
    }
}

/// A regular piece or pawn move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceMove {
    pub piece: Piece,
    pub from_file: Option<u8>,
    pub from_rank: Option<u8>,
    pub capture: bool,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

impl PieceMove {
    pub fn has_hint(&self) -> bool {
        self.from_file.is_some() || self.from_rank.is_some()
    }

    /// Whether `square` agrees with every disambiguation hint given
    pub fn matches_hint(&self, square: Square) -> bool {
        self.from_file.map_or(true, |file| square.file() == file)
            && self.from_rank.map_or(true, |rank| square.rank() == rank)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveToken {
    Castle { color: Color, side: CastleSide },
    Piece(PieceMove),
}

impl MoveToken {
    /// Parse a canonical token for the side to move
    pub fn parse(token: &str, color: Color) -> Result<MoveToken, MoveError> {
        let malformed = |reason: &str| MoveError::MalformedToken {
            token: token.to_string(),
            reason: reason.to_string(),
        };

        let text = strip_suffixes(token);
        if text.is_empty() {
            return Err(malformed("empty move"));
        }
        if !text.is_ascii() {
            return Err(malformed("non-ASCII characters"));
        }

        if text.to_ascii_uppercase().contains('O') {
            let side = match text.to_ascii_uppercase().as_str() {
                "O-O" => CastleSide::Kingside,
                "O-O-O" => CastleSide::Queenside,
                _ => return Err(malformed("unrecognised castling notation")),
            };
            return Ok(MoveToken::Castle { color, side });
        }

        let mut chars: Vec<char> = text.chars().collect();
        let piece = Piece::from_char(chars[0]).ok_or_else(|| malformed("missing piece letter"))?;
        if piece.color != color {
            return Err(malformed(&format!("piece letter is not {}'s", color)));
        }
        chars.remove(0);

        let promotion = match chars.last() {
            Some(&c) if is_promotion_letter(&chars) => {
                let kind =
                    PieceKind::from_char(c).ok_or_else(|| malformed("bad promotion letter"))?;
                chars.pop();
                if chars.last() == Some(&'=') {
                    chars.pop();
                }
                Some(kind)
            }
            _ => None,
        };
        if let Some(kind) = promotion {
            if piece.kind != PieceKind::Pawn {
                return Err(malformed("only pawns promote"));
            }
            if matches!(kind, PieceKind::Pawn | PieceKind::King) {
                return Err(malformed(&format!("cannot promote to {}", kind)));
            }
        }

        if chars.len() < 2 {
            return Err(malformed("missing destination square"));
        }
        let dest: String = chars.split_off(chars.len() - 2).into_iter().collect();
        let to = Square::from_algebraic(&dest).map_err(|e| malformed(&e))?;

        let capture = chars.last() == Some(&'x');
        if capture {
            chars.pop();
        }

        let (from_file, from_rank) = match chars.as_slice() {
            [] => (None, None),
            [c] => match (file_index(*c), rank_index(*c)) {
                (Some(file), _) => (Some(file), None),
                (_, Some(rank)) => (None, Some(rank)),
                _ => return Err(malformed("bad disambiguation hint")),
            },
            [f, r] => match (file_index(*f), rank_index(*r)) {
                (Some(file), Some(rank)) => (Some(file), Some(rank)),
                _ => return Err(malformed("bad disambiguation hint")),
            },
            _ => return Err(malformed("disambiguation hint too long")),
        };

        Ok(MoveToken::Piece(PieceMove {
            piece,
            from_file,
            from_rank,
            capture,
            to,
            promotion,
        }))
    }
}

/// A trailing letter after a destination square is a promotion piece
///
/// Black's tokens are lowercased, so `=q` or `e1q` must be recognised by
/// position rather than by case.
fn is_promotion_letter(chars: &[char]) -> bool {
    match chars {
        [.., rank, last] => last.is_ascii_alphabetic() && (rank.is_ascii_digit() || *rank == '='),
        _ => false,
    }
}

/// Drop check, mate and annotation glyphs
pub fn strip_suffixes(token: &str) -> &str {
    token.trim().trim_end_matches(&['+', '#', '!', '?'][..])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    fn piece_move(token: &str, color: Color) -> PieceMove {
        match MoveToken::parse(token, color).unwrap() {
            MoveToken::Piece(mv) => mv,
            other => panic!("expected piece move, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_simple_moves() {
        let mv = piece_move("Nf3", Color::White);
        assert_eq!(mv.piece, Piece::new(PieceKind::Knight, Color::White));
        assert_eq!(mv.to, sq("f3"));
        assert!(!mv.capture);
        assert!(!mv.has_hint());

        let mv = piece_move("pe5", Color::Black);
        assert_eq!(mv.piece, Piece::new(PieceKind::Pawn, Color::Black));
        assert_eq!(mv.to, sq("e5"));
    }

    #[test]
    fn test_parse_captures_and_hints() {
        let mv = piece_move("Pexd5", Color::White);
        assert!(mv.capture);
        assert_eq!(mv.from_file, Some(4));
        assert_eq!(mv.from_rank, None);
        assert_eq!(mv.to, sq("d5"));

        let mv = piece_move("nbd7", Color::Black);
        assert_eq!(mv.from_file, Some(1));
        assert!(!mv.capture);

        let mv = piece_move("R1xd4", Color::White);
        assert_eq!(mv.from_rank, Some(0));
        assert_eq!(mv.from_file, None);
        assert!(mv.capture);

        let mv = piece_move("Qh4e1", Color::White);
        assert!(mv.matches_hint(sq("h4")));
        assert!(!mv.matches_hint(sq("h5")));
    }

    #[test]
    fn test_parse_promotion() {
        let mv = piece_move("Pe8Q", Color::White);
        assert_eq!(mv.promotion, Some(PieceKind::Queen));
        assert_eq!(mv.to, sq("e8"));

        let mv = piece_move("Pdxe8=N+", Color::White);
        assert_eq!(mv.promotion, Some(PieceKind::Knight));
        assert!(mv.capture);

        let mv = piece_move("pe1=q", Color::Black);
        assert_eq!(mv.promotion, Some(PieceKind::Queen));
        assert_eq!(mv.to, sq("e1"));

        let mv = piece_move("pa1r#", Color::Black);
        assert_eq!(mv.promotion, Some(PieceKind::Rook));
    }

    #[test]
    fn test_parse_castling() {
        assert_eq!(
            MoveToken::parse("O-O", Color::White).unwrap(),
            MoveToken::Castle {
                color: Color::White,
                side: CastleSide::Kingside,
            }
        );
        assert_eq!(
            MoveToken::parse("o-o-o+", Color::Black).unwrap(),
            MoveToken::Castle {
                color: Color::Black,
                side: CastleSide::Queenside,
            }
        );
        assert!(MoveToken::parse("O-O-O-O", Color::White).is_err());
    }

    #[test]
    fn test_suffixes_are_ignored() {
        assert_eq!(piece_move("Rd8#", Color::White), piece_move("Rd8", Color::White));
        assert_eq!(piece_move("Bb5+", Color::White), piece_move("Bb5", Color::White));
        assert_eq!(piece_move("Nf3!?", Color::White), piece_move("Nf3", Color::White));
    }

    #[test]
    fn test_parse_errors() {
        for (token, color) in [
            ("", Color::White),
            ("Zf3", Color::White),
            ("Nf9", Color::White),
            ("nf3", Color::White),
            ("Nf3", Color::Black),
            ("Ne8Q", Color::White),
            ("Pe8K", Color::White),
            ("Nabcf3", Color::White),
            ("N", Color::White),
        ] {
            let err = MoveToken::parse(token, color).unwrap_err();
            assert!(
                matches!(err, MoveError::MalformedToken { .. }),
                "{} should be malformed, got {:?}",
                token,
                err
            );
        }
    }
}
