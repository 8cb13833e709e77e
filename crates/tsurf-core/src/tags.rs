//! Exuberant-ctags tag lines
//!
//! ```text
//! tagName<TAB>tagFile<TAB>exCmd;"<TAB>extension<TAB>extension...
//! ```
//!
//! An extension is either a bare kind letter (`f`) or `key:value`
//! (`line:42`, `class:Foo`). Pseudo-tag lines (`!_TAG_...`) carry no tag.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

/// Tag line parse errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TagParseError {
    #[error("missing ';\"' separator")]
    MissingSeparator,

    #[error("expected 3 tab-separated fields before ';\"', found {found}")]
    FieldCount { found: usize },

    #[error("empty tag name")]
    EmptyName,

    #[error("pseudo-tag or blank line")]
    NotATag,
}

/// A single tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub file: String,
    pub excmd: String,
    pub exts: BTreeMap<String, String>,
}

impl Tag {
    pub fn kind(&self) -> Option<&str> {
        self.exts.get("kind").map(String::as_str)
    }

    /// Line number from the `line` extension, else from a numeric exCmd
    pub fn line(&self) -> Option<usize> {
        self.exts
            .get("line")
            .and_then(|l| l.parse().ok())
            .or_else(|| self.excmd.parse().ok())
    }
}

/// Parse one tag line.
///
/// `kinds` maps short kind letters to long names; unknown kinds are kept
/// as written.
pub fn parse_tag_line(
    line: &str,
    kinds: &HashMap<String, String>,
) -> Result<Tag, TagParseError> {
    let line = line.trim_matches(|c| c == ' ' || c == '\n' || c == '\r');
    if line.is_empty() || line.starts_with("!_TAG_") {
        return Err(TagParseError::NotATag);
    }

    let (fields, raw_exts) = line
        .split_once(";\"")
        .ok_or(TagParseError::MissingSeparator)?;

    let fields: Vec<&str> = fields.split('\t').collect();
    let [name, file, excmd] = fields[..] else {
        return Err(TagParseError::FieldCount {
            found: fields.len(),
        });
    };
    if name.is_empty() {
        return Err(TagParseError::EmptyName);
    }

    let mut exts = BTreeMap::new();
    for ext in raw_exts.trim_matches('\t').split('\t') {
        if ext.is_empty() {
            continue;
        }
        match ext.split_once(':') {
            Some((key, value)) if !is_kind_letter(ext) => {
                exts.insert(key.to_string(), value.to_string());
            }
            _ => {
                let kind = kinds.get(ext).cloned().unwrap_or_else(|| ext.to_string());
                exts.insert("kind".to_string(), kind);
            }
        }
    }

    Ok(Tag {
        name: name.to_string(),
        file: file.to_string(),
        excmd: excmd.to_string(),
        exts,
    })
}

fn is_kind_letter(ext: &str) -> bool {
    let mut chars = ext.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_alphabetic())
}

/// Parse a whole ctags output.
///
/// Malformed lines are skipped, as are tags whose kind is in `exclude_kinds`.
pub fn parse_tags(
    text: &str,
    kinds: &HashMap<String, String>,
    exclude_kinds: &HashSet<String>,
) -> Vec<Tag> {
    let mut tags = Vec::new();
    let mut skipped = 0usize;

    for (lineno, line) in text.lines().enumerate() {
        match parse_tag_line(line, kinds) {
            Ok(tag) => {
                if tag.kind().is_some_and(|k| exclude_kinds.contains(k)) {
                    trace!(name = %tag.name, "excluded by kind");
                    continue;
                }
                tags.push(tag);
            }
            Err(TagParseError::NotATag) => {}
            Err(e) => {
                skipped += 1;
                trace!(line = lineno + 1, error = %e, "skipping tag line");
            }
        }
    }

    debug!(tags = tags.len(), skipped, "parsed tags");
    tags
}
