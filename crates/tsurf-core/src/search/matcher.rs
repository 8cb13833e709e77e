//! Subsequence scan shared by both backends
//!
//! Walks the candidate once, left to right, advancing through the query
//! whenever the current candidate char satisfies the case policy. No
//! backtracking and no alternate start points: the first subsequence
//! occurrence is the one that gets scored.

/// Positions recorded by a successful scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matched {
    /// Char indices into the candidate, strictly increasing
    pub positions: Vec<usize>,
    /// How many of `positions` sit on a word boundary
    pub boundary_count: usize,
    /// Candidate length in chars
    pub candidate_len: usize,
}

/// Simple one-to-one case folding.
///
/// Chars whose lowercase form expands to several chars fold to themselves.
#[inline]
pub fn fold(c: char) -> char {
    if c.is_ascii() {
        return c.to_ascii_lowercase();
    }
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

/// True when `s` has no lowercase char.
///
/// Case-derived boundaries are disabled for such candidates: in `HTTP_SERVER`
/// every letter would otherwise start a word.
#[inline]
pub fn is_all_uppercase(s: &str) -> bool {
    !s.chars().any(char::is_lowercase)
}

/// Chars after which a new word starts
#[inline]
pub fn is_word_separator(c: char) -> bool {
    c == '-' || c == '_'
}

/// Case policy for one query char against one candidate char
#[inline]
pub(crate) fn chars_match(q: char, c: char, smart_case: bool) -> bool {
    if smart_case && q.is_uppercase() {
        q == c
    } else {
        fold(q) == fold(c)
    }
}

/// Char-level scan. Returns `None` for an empty query or when the query
/// is not fully consumed by the end of the candidate.
pub(crate) fn scan_chars(query: &str, candidate: &str, smart_case: bool) -> Option<Matched> {
    let needle: Vec<char> = query.chars().collect();
    if needle.is_empty() {
        return None;
    }

    let uppercase_is_word_boundary = !is_all_uppercase(candidate);
    let mut positions = Vec::with_capacity(needle.len());
    let mut boundary_count = 0;
    let mut prev: Option<char> = None;

    for (i, c) in candidate.chars().enumerate() {
        if chars_match(needle[positions.len()], c, smart_case) {
            let boundary = i == 0
                || (uppercase_is_word_boundary && c.is_uppercase())
                || prev.is_some_and(is_word_separator);
            if boundary {
                boundary_count += 1;
            }
            positions.push(i);
            if positions.len() == needle.len() {
                break;
            }
        }
        prev = Some(c);
    }

    if positions.len() < needle.len() {
        return None;
    }

    Some(Matched {
        positions,
        boundary_count,
        candidate_len: candidate.chars().count(),
    })
}
