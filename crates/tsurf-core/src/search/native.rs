//! Native backend
//!
//! Same contract as the reference backend, different execution:
//! - ASCII query and candidate are scanned as bytes, jumping straight to
//!   the next occurrence of the current needle byte (SIMD via memchr when
//!   the `simd` feature is on)
//! - non-ASCII input goes through the shared char scan, since byte and
//!   char indices diverge and folding is no longer byte-local
//! - the score is computed in O(k) from prefix sums

use super::matcher::{scan_chars, Matched};
use super::{MatchResult, NO_MATCH};

pub(crate) fn search(query: &str, candidate: &str, smart_case: bool) -> MatchResult {
    if query.is_empty() {
        return MatchResult::no_match();
    }

    let matched = if query.is_ascii() && candidate.is_ascii() {
        scan_bytes(query.as_bytes(), candidate.as_bytes(), smart_case)
    } else {
        scan_chars(query, candidate, smart_case)
    };

    match matched {
        Some(m) => MatchResult {
            score: fast_score(m.candidate_len, &m.positions, m.boundary_count),
            positions: m.positions,
        },
        None => MatchResult::no_match(),
    }
}

fn scan_bytes(needle: &[u8], haystack: &[u8], smart_case: bool) -> Option<Matched> {
    if needle.len() > haystack.len() {
        return None;
    }

    let uppercase_is_word_boundary = haystack.iter().any(u8::is_ascii_lowercase);
    let mut positions = Vec::with_capacity(needle.len());
    let mut boundary_count = 0;
    let mut from = 0;

    for &b in needle {
        let i = from + find_next(b, &haystack[from..], smart_case)?;
        let c = haystack[i];
        if i == 0
            || (uppercase_is_word_boundary && c.is_ascii_uppercase())
            || matches!(haystack[i - 1], b'-' | b'_')
        {
            boundary_count += 1;
        }
        positions.push(i);
        from = i + 1;
    }

    Some(Matched {
        positions,
        boundary_count,
        candidate_len: haystack.len(),
    })
}

/// Offset of the first byte in `haystack` that `b` matches under the case policy
#[cfg(feature = "simd")]
#[inline]
fn find_next(b: u8, haystack: &[u8], smart_case: bool) -> Option<usize> {
    if (smart_case && b.is_ascii_uppercase()) || !b.is_ascii_alphabetic() {
        memchr::memchr(b, haystack)
    } else {
        memchr::memchr2(b.to_ascii_lowercase(), b.to_ascii_uppercase(), haystack)
    }
}

#[cfg(not(feature = "simd"))]
#[inline]
fn find_next(b: u8, haystack: &[u8], smart_case: bool) -> Option<usize> {
    if smart_case && b.is_ascii_uppercase() {
        haystack.iter().position(|&c| c == b)
    } else {
        haystack.iter().position(|c| c.eq_ignore_ascii_case(&b))
    }
}

/// O(k) form of the reference score.
///
/// For increasing positions the pairwise distance sum is
/// `sum_j (j * p_j - (p_0 + .. + p_{j-1}))`.
fn fast_score(candidate_len: usize, positions: &[usize], boundary_count: usize) -> f64 {
    let k = positions.len();
    if k == 0 {
        return NO_MATCH;
    }

    let mut len_ratio = candidate_len as f64 / k as f64;
    if boundary_count > 0 {
        len_ratio /= (boundary_count + 1) as f64;
    }

    if k == 1 {
        return positions[0] as f64 + len_ratio;
    }

    let mut prefix = 0u64;
    let mut diffs_sum = 0u64;
    for (j, &p) in positions.iter().enumerate() {
        let p = p as u64;
        diffs_sum += p * j as u64 - prefix;
        prefix += p;
    }

    let pairs = (k * (k - 1) / 2) as f64;
    diffs_sum as f64 / pairs + prefix as f64 / k as f64 + len_ratio
}
