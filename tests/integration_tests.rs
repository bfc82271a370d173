use std::fs;

use pgnboard::{Board, Color, GameReplayer, Piece, PieceKind, Square};

// Integration tests for full game replay
// Games under test/data are replayed end to end and checked against their known final positions

fn sq(name: &str) -> Square {
    Square::from_algebraic(name).unwrap()
}

fn load_game(name: &str) -> String {
    let path = format!("test/data/{}.pgn", name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {}: {}", path, e))
}

/// Assert the complete position, square by square
///
/// Each entry is a piece symbol followed by its square, e.g. `"Kc1"` or `"pe5"`.
fn assert_position(board: &Board, expected: &[&str]) {
    for square in Square::all() {
        let wanted = expected
            .iter()
            .find(|entry| sq(&entry[1..]) == square)
            .and_then(|entry| entry.chars().next())
            .and_then(Piece::from_char);
        assert_eq!(
            board.piece_at(square),
            wanted,
            "Unexpected occupant on {}",
            square
        );
    }
    assert!(board.is_consistent(), "Board views disagree");
}

#[test]
fn test_opera_game_final_position() {
    let report = GameReplayer::new()
        .replay(&load_game("opera"))
        .expect("Opera game should replay");

    assert_eq!(report.applied.len(), 33, "17 white and 16 black half-moves");
    assert!(report.skipped.is_empty());

    assert_position(
        &report.board,
        &[
            "Kc1", "Rd8", "Bg5", "Pa2", "Pb2", "Pc2", "Pe4", "Pf2", "Pg2", "Ph2", "ke8", "qe6",
            "rh8", "bf8", "nb8", "pa7", "pe5", "pf7", "pg7", "ph7",
        ],
    );
}

#[test]
fn test_promotion_game_final_position() {
    let report = GameReplayer::new()
        .replay(&load_game("promotion"))
        .expect("Promotion game should replay");

    assert_eq!(report.applied.len(), 14);

    let promotions: Vec<_> = report
        .applied
        .iter()
        .filter_map(|mv| mv.promoted_to.map(|kind| (mv.piece.color, kind, mv.to)))
        .collect();
    assert_eq!(
        promotions,
        vec![
            (Color::White, PieceKind::Queen, sq("a8")),
            (Color::Black, PieceKind::Knight, sq("h1")),
        ]
    );

    assert_position(
        &report.board,
        &[
            "Kf2", "Qd1", "Qb8", "Ra1", "Nb1", "Ng1", "Bc1", "Bf1", "Pb2", "Pc2", "Pd2", "Pe2",
            "Ph2", "ke8", "qd8", "rh8", "ng8", "bc8", "bf8", "pa7", "pc7", "pd7", "pe5", "pf7",
            "pg7",
        ],
    );
}

#[test]
fn test_kingside_castling_scenario() {
    let board = pgnboard::replay("1. e4 e5 2. Nf3 Nc6 3. Bc4 Bc5 4. O-O Nf6")
        .expect("Castling game should replay");

    assert_eq!(
        board.piece_at(sq("g1")),
        Some(Piece::new(PieceKind::King, Color::White))
    );
    assert_eq!(
        board.piece_at(sq("f1")),
        Some(Piece::new(PieceKind::Rook, Color::White))
    );
    assert_eq!(board.piece_at(sq("e1")), None);
    assert_eq!(board.piece_at(sq("h1")), None);
    assert_eq!(
        board.squares_of(Piece::new(PieceKind::Rook, Color::White)),
        &[sq("a1"), sq("f1")]
    );
}

#[test]
fn test_black_castles_on_home_rank() {
    let board = pgnboard::replay("1. d4 d5 2. Nc3 Nc6 3. Bf4 Bf5 4. Qd2 Qd7 5. O-O-O O-O-O")
        .expect("Queenside castling game should replay");

    for (square, symbol) in [("c1", 'K'), ("d1", 'R'), ("c8", 'k'), ("d8", 'r')] {
        assert_eq!(board.piece_at(sq(square)), Piece::from_char(symbol), "{}", square);
    }
    for square in ["a1", "e1", "a8", "e8"] {
        assert_eq!(board.piece_at(sq(square)), None, "{} should be empty", square);
    }
}

#[test]
fn test_comment_spans_are_fully_removed() {
    let plain = pgnboard::replay("1. e4 e5 2. Nf3 Nc6").unwrap();

    for annotated in [
        "1. e4 {2. d4 3. c4 4. Nc3} e5 2. Nf3 Nc6",
        "{1. f4 f5} 1. e4 e5 {10. Qh5} 2. Nf3 {11... Qxh5} Nc6 {1-0}",
        "1. e4 e5 2. Nf3 Nc6 {final comment with 99. Kh1 inside}",
    ] {
        let board = pgnboard::replay(annotated).expect("annotated game should replay");
        assert_eq!(board, plain, "comment changed the replay: {}", annotated);
    }
}

#[test]
fn test_zero_moves_yields_starting_position() {
    let board = pgnboard::replay("[Event \"Empty\"]\n\n*").unwrap();
    assert_eq!(board, Board::initialize());
    assert_eq!(board.occupied_count(), 32);
    assert_eq!(board.snapshot(), Board::initialize().snapshot());
}

#[test]
fn test_malformed_document_aborts_replay() {
    let result = pgnboard::replay("1. e4 e5 {unclosed 2. Nf3 Nc6");
    assert!(matches!(result, Err(pgnboard::ReplayError::Tokenize(_))));
}

#[test]
fn test_clock_annotated_game_replays() {
    let plain = GameReplayer::new()
        .replay("1. e4 e5 2. Nf3 Nc6 3. Bb5 a6 4. Ba4")
        .unwrap();

    let clocked = GameReplayer::new()
        .replay(&load_game("clocked"))
        .expect("Clock-annotated game should replay");

    assert_eq!(clocked.applied.len(), 7);
    assert_eq!(clocked.board, plain.board);
}

#[test]
fn test_doubled_pawn_advances_front_pawn() {
    let board = pgnboard::replay("1. Nf3 d5 2. g3 Bg4 3. Bg2 Bxf3 4. exf3 e6 5. f4 Nf6")
        .expect("Doubled pawn game should replay");

    let white_pawn = Piece::new(PieceKind::Pawn, Color::White);
    assert_eq!(board.piece_at(sq("f2")), Some(white_pawn));
    assert_eq!(board.piece_at(sq("f3")), None);
    assert_eq!(board.piece_at(sq("f4")), Some(white_pawn));
    assert!(board.is_consistent());
}
