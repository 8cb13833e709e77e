//! Reference backend: char scan plus the pairwise score formula

use super::matcher::scan_chars;
use super::scorer::score;
use super::MatchResult;

pub(crate) fn search(query: &str, candidate: &str, smart_case: bool) -> MatchResult {
    match scan_chars(query, candidate, smart_case) {
        Some(m) => MatchResult {
            score: score(m.candidate_len, &m.positions, m.boundary_count),
            positions: m.positions,
        },
        None => MatchResult::no_match(),
    }
}
