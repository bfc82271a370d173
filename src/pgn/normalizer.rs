use crate::board::Color;
use crate::error::TokenizeError;

/// One numbered move: white's half-move and, unless the game stopped, black's
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovePair {
    pub white: String,
    pub black: Option<String>,
}

/// Canonicalize a half-move so its first letter names both piece and colour
///
/// Pawn moves get an explicit `P`/`p`; every black token is lowercased.
pub fn normalize_token(raw: &str, color: Color) -> String {
    let pawn_move = raw.starts_with(|c: char| ('a'..='h').contains(&c));
    match (color, pawn_move) {
        (Color::White, true) => format!("P{}", raw),
        (Color::White, false) => raw.to_string(),
        (Color::Black, true) => format!("p{}", raw),
        (Color::Black, false) => raw.to_lowercase(),
    }
}

/// Turn tokenizer segments into canonical move pairs
///
/// Only the final segment may lack black's half-move.
pub fn normalize_pairs(segments: &[String]) -> Result<Vec<MovePair>, TokenizeError> {
    let last = segments.len().saturating_sub(1);

    segments
        .iter()
        .enumerate()
        .map(|(index, segment)| {
            let malformed = || TokenizeError::MalformedMovePair {
                index: index + 1,
                segment: segment.clone(),
            };

            let tokens: Vec<&str> = segment.split_whitespace().collect();
            match tokens.as_slice() {
                [white, black] => Ok(MovePair {
                    white: normalize_token(white, Color::White),
                    black: Some(normalize_token(black, Color::Black)),
                }),
                [white] if index == last => Ok(MovePair {
                    white: normalize_token(white, Color::White),
                    black: None,
                }),
                _ => Err(malformed()),
            }
        })
        .collect()
}
