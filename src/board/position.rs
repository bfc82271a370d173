/// Board state for movetext replay
///
/// The position is held in two views that are always updated together:
/// an occupancy array indexed by square, and a piece index mapping every
/// (kind, colour) pair to the squares it currently stands on. The order of
/// each piece-index bucket is meaningful: it is the order in which the
/// resolver tries candidates, so it must be reproducible.
use std::collections::HashMap;
use std::fmt;

use crate::error::BoardError;

/// Chess piece kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Uppercase notation letter (white's form)
    pub fn to_char(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    /// Parse a notation letter in either case
    pub fn from_char(c: char) -> Option<PieceKind> {
        match c.to_ascii_uppercase() {
            'P' => Some(PieceKind::Pawn),
            'N' => Some(PieceKind::Knight),
            'B' => Some(PieceKind::Bishop),
            'R' => Some(PieceKind::Rook),
            'Q' => Some(PieceKind::Queen),
            'K' => Some(PieceKind::King),
            _ => None,
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            PieceKind::Pawn => "pawn",
            PieceKind::Knight => "knight",
            PieceKind::Bishop => "bishop",
            PieceKind::Rook => "rook",
            PieceKind::Queen => "queen",
            PieceKind::King => "king",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Rank the pieces start on, 0-based (rank 1 for white, rank 8 for black)
    pub fn home_rank(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    /// Rank the pawns start on, 0-based
    pub fn pawn_rank(self) -> u8 {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }

    /// Rank a pawn promotes on, 0-based
    pub fn promotion_rank(self) -> u8 {
        self.opposite().home_rank()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

/// A piece is a value: two white pawns are interchangeable except by location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    pub const fn new(kind: PieceKind, color: Color) -> Self {
        Piece { kind, color }
    }

    /// Notation letter with colour folded into case: uppercase white, lowercase black
    pub fn to_char(self) -> char {
        match self.color {
            Color::White => self.kind.to_char(),
            Color::Black => self.kind.to_char().to_ascii_lowercase(),
        }
    }

    /// Inverse of [`Piece::to_char`]
    pub fn from_char(c: char) -> Option<Piece> {
        let kind = PieceKind::from_char(c)?;
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some(Piece::new(kind, color))
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.color, self.kind)
    }
}

/// Chess square (0-63 for a1-h8)
///
/// Only built through the checked constructors, so the index always fits
/// the 64-slot occupancy array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(pub(crate) u8);

impl Square {
    pub fn from_index(index: u8) -> Option<Square> {
        (index < 64).then_some(Square(index))
    }

    /// All 64 squares, a1 through h8
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64).map(Square)
    }

    pub fn index(self) -> u8 {
        self.0
    }

    pub fn new(file: u8, rank: u8) -> Result<Square, String> {
        if file >= 8 || rank >= 8 {
            return Err(format!("Invalid square: file={}, rank={}", file, rank));
        }
        Ok(Square(rank * 8 + file))
    }

    pub fn from_algebraic(notation: &str) -> Result<Square, String> {
        let bytes = notation.as_bytes();
        if bytes.len() != 2 {
            return Err(format!("Square notation must be 2 characters: '{}'", notation));
        }

        let file = file_index(bytes[0] as char)
            .ok_or_else(|| format!("Invalid file in '{}'", notation))?;
        let rank = rank_index(bytes[1] as char)
            .ok_or_else(|| format!("Invalid rank in '{}'", notation))?;

        Square::new(file, rank)
    }

    pub fn file(self) -> u8 {
        self.0 % 8
    }

    pub fn rank(self) -> u8 {
        self.0 / 8
    }

    pub fn file_char(self) -> char {
        (b'a' + self.file()) as char
    }

    pub fn rank_char(self) -> char {
        (b'1' + self.rank()) as char
    }

    pub fn to_algebraic(self) -> String {
        format!("{}{}", self.file_char(), self.rank_char())
    }

    /// Absolute (file, rank) distance to another square
    pub fn delta(self, other: Square) -> (u8, u8) {
        (
            self.file().abs_diff(other.file()),
            self.rank().abs_diff(other.rank()),
        )
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}

/// 0-based file for a file letter `a`-`h`
pub fn file_index(c: char) -> Option<u8> {
    match c {
        'a'..='h' => Some(c as u8 - b'a'),
        _ => None,
    }
}

/// 0-based rank for a rank digit `1`-`8`
pub fn rank_index(c: char) -> Option<u8> {
    match c {
        '1'..='8' => Some(c as u8 - b'1'),
        _ => None,
    }
}

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Complete board state: occupancy plus piece index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    occupancy: [Option<Piece>; 64],
    index: HashMap<Piece, Vec<Square>>,
}

impl Board {
    /// Board with no pieces on it
    pub fn empty() -> Self {
        Board {
            occupancy: [None; 64],
            index: HashMap::new(),
        }
    }

    /// Standard starting position
    ///
    /// Squares are filled a1 through h8, so every piece-index bucket lists
    /// its squares in that order (the a-file rook before the h-file rook).
    pub fn initialize() -> Self {
        let mut board = Board::empty();

        for square in Square::all() {
            let kind = match square.rank() {
                0 | 7 => BACK_RANK[square.file() as usize],
                1 | 6 => PieceKind::Pawn,
                _ => continue,
            };
            let color = if square.rank() < 4 {
                Color::White
            } else {
                Color::Black
            };
            board.place(Piece::new(kind, color), square);
        }

        board
    }

    /// Put a piece on a square, dropping whatever stood there
    ///
    /// Returns the piece that was replaced.
    pub fn place(&mut self, piece: Piece, square: Square) -> Option<Piece> {
        let previous = self.remove(square);
        self.occupancy[square.0 as usize] = Some(piece);
        self.index.entry(piece).or_default().push(square);
        previous
    }

    /// Clear a square, removing its occupant from both views
    pub fn remove(&mut self, square: Square) -> Option<Piece> {
        let previous = self.occupancy[square.0 as usize].take()?;
        self.detach(previous, square);
        Some(previous)
    }

    /// Move `piece` from `from` to `to`, capturing whatever stands on `to`
    ///
    /// The captured occupant leaves its own bucket before the mover is
    /// appended to the end of its bucket. Returns the captured piece.
    pub fn relocate(
        &mut self,
        piece: Piece,
        from: Square,
        to: Square,
    ) -> Result<Option<Piece>, BoardError> {
        if self.piece_at(from) != Some(piece) {
            return Err(BoardError::IllegalRelocation { piece, from });
        }
        if let Some(occupant) = self.piece_at(to) {
            if occupant.color == piece.color && from != to {
                return Err(BoardError::OwnPieceCaptured {
                    piece: occupant,
                    square: to,
                });
            }
        }

        self.remove(from);
        Ok(self.place(piece, to))
    }

    /// Swap the pawn on `square` for a piece of `kind` and the same colour
    pub fn promote(&mut self, square: Square, kind: PieceKind) -> Result<Piece, BoardError> {
        let pawn = match self.piece_at(square) {
            Some(piece) if piece.kind == PieceKind::Pawn => piece,
            Some(piece) => {
                return Err(BoardError::IllegalPromotion {
                    square,
                    reason: format!("{} is not a pawn", piece),
                })
            }
            None => {
                return Err(BoardError::IllegalPromotion {
                    square,
                    reason: "square is empty".to_string(),
                })
            }
        };
        if matches!(kind, PieceKind::Pawn | PieceKind::King) {
            return Err(BoardError::IllegalPromotion {
                square,
                reason: format!("cannot promote to {}", kind),
            });
        }
        if square.rank() != pawn.color.promotion_rank() {
            return Err(BoardError::IllegalPromotion {
                square,
                reason: format!("{} has not reached the last rank", pawn),
            });
        }

        let promoted = Piece::new(kind, pawn.color);
        self.place(promoted, square);
        Ok(promoted)
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.occupancy[square.0 as usize]
    }

    /// Squares holding `piece`, in piece-index order
    pub fn squares_of(&self, piece: Piece) -> &[Square] {
        self.index.get(&piece).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn occupied_count(&self) -> usize {
        self.occupancy.iter().filter(|slot| slot.is_some()).count()
    }

    /// Find the king of the specified colour (first in its bucket)
    pub fn find_king(&self, color: Color) -> Option<Square> {
        self.squares_of(Piece::new(PieceKind::King, color))
            .first()
            .copied()
    }

    /// Whether occupancy and the piece index describe the same position
    pub fn is_consistent(&self) -> bool {
        let indexed: usize = self.index.values().map(Vec::len).sum();
        if indexed != self.occupied_count() {
            return false;
        }
        self.index.iter().all(|(piece, squares)| {
            squares
                .iter()
                .all(|square| self.piece_at(*square) == Some(*piece))
        })
    }

    /// Read-only row-major view, rank 8 down to rank 1, file a to h
    pub fn snapshot(&self) -> Snapshot {
        let mut squares = [None; 64];
        for (row, rank) in (0..8u8).rev().enumerate() {
            for file in 0..8u8 {
                squares[row * 8 + file as usize] = self.occupancy[(rank * 8 + file) as usize];
            }
        }
        Snapshot { squares }
    }

    fn detach(&mut self, piece: Piece, square: Square) {
        if let Some(bucket) = self.index.get_mut(&piece) {
            bucket.retain(|s| *s != square);
            if bucket.is_empty() {
                self.index.remove(&piece);
            }
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::initialize()
    }
}

/// Row-major copy of the board for display or other consumers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    squares: [Option<Piece>; 64],
}

impl Snapshot {
    /// The 64 entries, rank 8 first, file a first within each rank
    pub fn to_row_major(&self) -> &[Option<Piece>; 64] {
        &self.squares
    }

    /// Entry for a square
    pub fn get(&self, square: Square) -> Option<Piece> {
        let row = 7 - square.rank() as usize;
        self.squares[row * 8 + square.file() as usize]
    }

    /// One line per rank, `.` for an empty square
    pub fn to_rows(&self) -> Vec<String> {
        self.squares
            .chunks(8)
            .map(|row| {
                row.iter()
                    .map(|slot| slot.map(Piece::to_char).unwrap_or('.'))
                    .collect::<String>()
            })
            .collect()
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "  a b c d e f g h")?;
        for (row, line) in self.to_rows().iter().enumerate() {
            let rank = 8 - row;
            write!(f, "{} ", rank)?;
            for symbol in line.chars() {
                write!(f, "{} ", symbol)?;
            }
            writeln!(f, " {}", rank)?;
        }
        write!(f, "  a b c d e f g h")
    }
}
