//! Similarity score (lower is better)

use super::NO_MATCH;

/// Score a set of match positions within a candidate of `candidate_len` chars.
///
/// Sums three penalties:
/// - mean pairwise distance between matched chars (scattered matches)
/// - mean match position (late matches)
/// - candidate length per query char, divided by `boundary_count + 1`
///   when any match sits on a word boundary
///
/// A single position has no pairs and scores `position + ratio`.
/// Empty `positions` yields [`NO_MATCH`].
pub fn score(candidate_len: usize, positions: &[usize], boundary_count: usize) -> f64 {
    if positions.is_empty() {
        return NO_MATCH;
    }

    let k = positions.len();
    let mut n = 0usize;
    let mut diffs_sum = 0usize;
    let mut positions_sum = 0usize;

    // every unordered pair (i, j), i < j
    for (i, &a) in positions.iter().enumerate() {
        positions_sum += a;
        for &b in &positions[i + 1..] {
            diffs_sum += a.abs_diff(b);
            n += 1;
        }
    }

    let mut len_ratio = candidate_len as f64 / k as f64;
    if boundary_count > 0 {
        len_ratio /= (boundary_count + 1) as f64;
    }

    if n > 0 {
        diffs_sum as f64 / n as f64 + positions_sum as f64 / k as f64 + len_ratio
    } else {
        positions[0] as f64 + len_ratio
    }
}
