//! Tag ranking
//!
//! Scores every tag name against the query and orders the survivors:
//! - non-empty query: matching tags only, best (lowest) score first
//! - empty query: every tag, nearest to the cursor line first when tags
//!   carry line numbers, else by name ignoring case
//!
//! On native with the `parallel` feature, large tag lists are scored
//! across threads with rayon; results are collected before sorting.

use std::cmp::Ordering;
use std::time::Instant;

use serde::Serialize;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::FinderConfig;
use crate::search::{Backend, NO_MATCH};
use crate::tags::Tag;

/// A tag with its match outcome
#[derive(Debug, Clone, Serialize)]
pub struct TagMatch<'a> {
    pub tag: &'a Tag,
    pub score: f64,
    pub positions: Vec<usize>,
}

/// Ranking settings
#[derive(Debug, Clone)]
pub struct Ranker {
    pub backend: Backend,
    pub smart_case: bool,
    pub max_results: Option<usize>,
    pub parallel_threshold: usize,
}

impl Default for Ranker {
    fn default() -> Self {
        Self::from_config(&FinderConfig::default())
    }
}

impl Ranker {
    pub fn from_config(config: &FinderConfig) -> Self {
        Self {
            backend: config.backend,
            smart_case: config.smart_matching,
            max_results: config.max_results,
            parallel_threshold: config.parallel_threshold,
        }
    }

    pub fn with_max_results(mut self, max_results: Option<usize>) -> Self {
        self.max_results = max_results;
        self
    }

    /// Rank `tags` against `query`.
    ///
    /// `cursor_line` orders empty-query results by distance from it.
    pub fn rank<'a>(
        &self,
        query: &str,
        tags: &'a [Tag],
        cursor_line: Option<usize>,
    ) -> Vec<TagMatch<'a>> {
        let start = Instant::now();

        let mut matches = if query.is_empty() {
            tags.iter()
                .map(|tag| TagMatch {
                    tag,
                    score: NO_MATCH,
                    positions: Vec::new(),
                })
                .collect()
        } else {
            self.match_tags(query, tags)
        };
        let matched = matches.len();

        if query.is_empty() {
            sort_unscored(&mut matches, cursor_line);
        } else {
            // stable: equal scores keep tag order
            matches.sort_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(Ordering::Equal));
        }

        if let Some(limit) = self.max_results {
            matches.truncate(limit);
        }

        debug!(
            backend = self.backend.name(),
            tags = tags.len(),
            matches = matched,
            elapsed_us = start.elapsed().as_micros() as u64,
            "ranked tags"
        );
        matches
    }

    /// Match against tags - parallel on native, sequential otherwise
    #[cfg(feature = "parallel")]
    fn match_tags<'a>(&self, query: &str, tags: &'a [Tag]) -> Vec<TagMatch<'a>> {
        if tags.len() >= self.parallel_threshold {
            tags.par_iter()
                .filter_map(|tag| self.match_single(query, tag))
                .collect()
        } else {
            self.match_sequential(query, tags)
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn match_tags<'a>(&self, query: &str, tags: &'a [Tag]) -> Vec<TagMatch<'a>> {
        self.match_sequential(query, tags)
    }

    fn match_sequential<'a>(&self, query: &str, tags: &'a [Tag]) -> Vec<TagMatch<'a>> {
        tags.iter()
            .filter_map(|tag| self.match_single(query, tag))
            .collect()
    }

    fn match_single<'a>(&self, query: &str, tag: &'a Tag) -> Option<TagMatch<'a>> {
        let m = self.backend.search(query, &tag.name, self.smart_case);
        m.is_match().then(|| TagMatch {
            tag,
            score: m.score,
            positions: m.positions,
        })
    }
}

/// Order for an empty query, where scores carry no information
fn sort_unscored(matches: &mut [TagMatch<'_>], cursor_line: Option<usize>) {
    let has_lines = matches.first().is_some_and(|m| m.tag.line().is_some());
    match cursor_line {
        Some(cursor) if has_lines => {
            matches.sort_by_key(|m| m.tag.line().map_or(usize::MAX, |l| l.abs_diff(cursor)));
        }
        _ => matches.sort_by_cached_key(|m| m.tag.name.to_lowercase()),
    }
}
