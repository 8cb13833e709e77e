//! Search scope modifiers
//!
//! A leading modifier in the user input selects which files tags are
//! generated for. With the default modifiers:
//!
//! - `%foo` searches the current buffer
//! - `#foo` searches the whole project
//! - `foo` searches all open buffers
//!
//! An empty input always searches the current buffer when there is one.

use serde::{Deserialize, Serialize};

use crate::config::FinderConfig;

/// Files tags are generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchScope {
    CurrentBuffer,
    OpenBuffers,
    Project,
}

impl SearchScope {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchScope::CurrentBuffer => "current_buffer",
            SearchScope::OpenBuffers => "open_buffers",
            SearchScope::Project => "project",
        }
    }

    /// Stable integer code used across the C ABI
    pub fn code(self) -> i32 {
        match self {
            SearchScope::CurrentBuffer => 0,
            SearchScope::OpenBuffers => 1,
            SearchScope::Project => 2,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(SearchScope::CurrentBuffer),
            1 => Some(SearchScope::OpenBuffers),
            2 => Some(SearchScope::Project),
            _ => None,
        }
    }
}

/// User input split into the query proper and its scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopedQuery {
    pub query: String,
    pub scope: SearchScope,
}

impl ScopedQuery {
    /// Resolve `input` against the configured modifiers.
    ///
    /// `has_current_buffer` is false when the editor has no named buffer
    /// focused; the buffer modifier then widens to open buffers.
    pub fn resolve(input: &str, config: &FinderConfig, has_current_buffer: bool) -> Self {
        let bmod = config.buffer_search_modifier.as_str();
        let pmod = config.project_search_modifier.as_str();
        let trimmed = input.trim();

        let scope = if has_current_buffer
            && (input.is_empty() || (!bmod.is_empty() && trimmed.starts_with(bmod)))
        {
            SearchScope::CurrentBuffer
        } else if !pmod.is_empty() && trimmed.starts_with(pmod) {
            SearchScope::Project
        } else {
            SearchScope::OpenBuffers
        };

        let query = input
            .trim_matches(|c: char| c == ' ' || bmod.contains(c) || pmod.contains(c))
            .to_string();

        Self { query, scope }
    }
}
