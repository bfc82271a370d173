use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::error::TokenizeError;

static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^}]*\}").expect("comment pattern is valid"));
static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*\]").expect("tag pattern is valid"));
static BLACK_CONTINUATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[1-9][0-9]*\s*\.\.+").expect("continuation pattern is valid")
});
static MOVE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[1-9][0-9]*\s*\.").expect("move number pattern is valid"));
static RESULT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*(1\s*-\s*0|0\s*-\s*1|1/2\s*-\s*1/2|½\s*-\s*½|\*)\s*")
        .expect("result pattern is valid")
});

/// Split raw PGN movetext into numbered segments
///
/// Each returned segment holds the half-moves between two move numbers,
/// normally "white black" (e.g. `"e4 e5"`). Comments `{...}` and tag pairs
/// `[...]` are removed before splitting, so move numbers inside them never
/// create segments. A black continuation number such as `12...` only
/// separates tokens: the black move stays in the segment of its white move.
/// The trailing result marker is dropped.
pub fn tokenize(raw: &str) -> Result<Vec<String>, TokenizeError> {
    let joined = raw.lines().map(str::trim).collect::<Vec<_>>().join(" ");

    check_balanced(&joined, '{', '}')?;
    let without_comments = COMMENT.replace_all(&joined, " ");

    check_balanced(&without_comments, '[', ']')?;
    let without_tags = TAG.replace_all(&without_comments, " ");
    let movetext = BLACK_CONTINUATION.replace_all(&without_tags, " ");
    trace!(%movetext, "stripped comments, tags and continuation numbers");

    let mut segments: Vec<String> = MOVE_NUMBER
        .split(&movetext)
        .map(|segment| segment.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect();

    if let Some(last) = segments.last_mut() {
        let stripped = RESULT.replace_all(last.as_str(), " ").trim().to_string();
        if let Some(bad) = stripped.split_whitespace().find(|token| looks_like_result(token)) {
            return Err(TokenizeError::MalformedResult(bad.to_string()));
        }
        *last = stripped;
    }

    segments.retain(|segment| !segment.is_empty());
    trace!(count = segments.len(), "split movetext into move pairs");
    Ok(segments)
}

/// Ensure every `open` has a matching `close` with no nesting
fn check_balanced(text: &str, open: char, close: char) -> Result<(), TokenizeError> {
    let unbalanced = |position| TokenizeError::UnbalancedDelimiter {
        open,
        close,
        position,
    };

    let mut opened_at = None;
    for (position, c) in text.char_indices() {
        if c == open {
            if opened_at.is_some() {
                return Err(unbalanced(position));
            }
            opened_at = Some(position);
        } else if c == close {
            if opened_at.take().is_none() {
                return Err(unbalanced(position));
            }
        }
    }

    match opened_at {
        Some(position) => Err(unbalanced(position)),
        None => Ok(()),
    }
}

fn looks_like_result(token: &str) -> bool {
    token.contains(&['-', '/'][..])
        && token
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '-' | '/' | '½'))
}
