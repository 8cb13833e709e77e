//! Fuzzy Tag Search
//!
//! Leftmost-greedy subsequence matching with a boundary-aware similarity
//! score. Two backends implement the same contract:
//!
//! - **Reference**: char-by-char scan and the pairwise score formula
//! - **Native**: byte scan with SIMD skipping (`simd` feature) and an
//!   O(k) score computed from prefix sums
//!
//! Both must agree on every input: same positions, scores within
//! [`SCORE_TOLERANCE`].
//!
//! # Scoring
//!
//! Lower is better. A score combines how scattered the matched characters
//! are, how late in the candidate they occur and how long the candidate is
//! relative to the query, discounted when matches land on word boundaries
//! (`camelCase` humps, characters following `_` or `-`, the first char).
//!
//! # Example
//!
//! ```rust
//! use tsurf_core::search::{search, NO_MATCH};
//!
//! let m = search("sup", "superLong_identifier", false);
//! assert_eq!(m.positions, vec![0, 1, 2]);
//!
//! let miss = search("amA", "androidManifest", true);
//! assert_eq!(miss.score, NO_MATCH);
//! assert!(miss.positions.is_empty());
//! ```

mod matcher;
mod native;
mod reference;
mod scorer;

pub use matcher::{fold, is_all_uppercase, is_word_separator, Matched};
pub use scorer::score;

use serde::{Deserialize, Serialize};

/// Score returned when the query does not match.
pub const NO_MATCH: f64 = -1.0;

/// Maximum score difference allowed between the two backends.
pub const SCORE_TOLERANCE: f64 = 1e-4;

/// Outcome of a single search: a score and the matched char positions.
///
/// `positions` is empty exactly when `score == NO_MATCH`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub score: f64,
    pub positions: Vec<usize>,
}

impl MatchResult {
    /// The sentinel no-match result.
    pub fn no_match() -> Self {
        Self {
            score: NO_MATCH,
            positions: Vec::new(),
        }
    }

    pub fn is_match(&self) -> bool {
        !self.positions.is_empty()
    }
}

impl Default for MatchResult {
    fn default() -> Self {
        Self::no_match()
    }
}

/// Which implementation of the matcher and scorer to run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Reference,
    #[default]
    Native,
}

impl Backend {
    /// Search `candidate` for `query` with this backend
    #[inline]
    pub fn search(self, query: &str, candidate: &str, smart_case: bool) -> MatchResult {
        match self {
            Backend::Reference => reference::search(query, candidate, smart_case),
            Backend::Native => native::search(query, candidate, smart_case),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Backend::Reference => "reference",
            Backend::Native => "native",
        }
    }
}

impl std::str::FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reference" | "ref" => Ok(Backend::Reference),
            "native" => Ok(Backend::Native),
            other => Err(format!("unknown backend: {}", other)),
        }
    }
}

/// Search `candidate` for `query` using the native backend.
///
/// Returns [`MatchResult::no_match`] for an empty query or when `query`
/// is not an ordered subsequence of `candidate` under the case policy.
/// With `smart_case`, uppercase query chars only match themselves.
#[inline]
pub fn search(query: &str, candidate: &str, smart_case: bool) -> MatchResult {
    Backend::Native.search(query, candidate, smart_case)
}
