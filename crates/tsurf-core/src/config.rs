//! Finder configuration
//!
//! Loaded from JSON; every field is optional.
//!
//! ```json
//! {
//!   "smart_matching": true,
//!   "max_results": 50,
//!   "types": {
//!     "python": { "kinds_map": { "c": "class" }, "exclude_kinds": ["v"] }
//!   }
//! }
//! ```

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::search::Backend;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("search modifiers must differ, both are '{0}'")]
    ModifierClash(String),
}

/// Per-filetype tag settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTypeConfig {
    /// Short kind letter -> long kind name
    pub kinds_map: HashMap<String, String>,
    /// Kinds (after mapping) dropped from results
    pub exclude_kinds: Vec<String>,
}

/// Tag finder configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinderConfig {
    /// Uppercase query chars only match uppercase tag chars
    pub smart_matching: bool,
    /// Result cap; `None` returns every match
    pub max_results: Option<usize>,
    pub buffer_search_modifier: String,
    pub project_search_modifier: String,
    pub backend: Backend,
    /// Tag count above which ranking fans out over rayon
    pub parallel_threshold: usize,
    pub types: HashMap<String, FileTypeConfig>,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            smart_matching: true,
            max_results: None,
            buffer_search_modifier: "%".to_string(),
            project_search_modifier: "#".to_string(),
            backend: Backend::Native,
            parallel_threshold: 1000,
            types: HashMap::new(),
        }
    }
}

impl FinderConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.buffer_search_modifier.is_empty()
            && self.buffer_search_modifier == self.project_search_modifier
        {
            return Err(ConfigError::ModifierClash(
                self.buffer_search_modifier.clone(),
            ));
        }
        Ok(())
    }

    /// Kinds map and exclusion set for `filetype`, empty when unknown
    pub fn kinds_for(&self, filetype: Option<&str>) -> (HashMap<String, String>, HashSet<String>) {
        match filetype.and_then(|ft| self.types.get(ft)) {
            Some(t) => (
                t.kinds_map.clone(),
                t.exclude_kinds.iter().cloned().collect(),
            ),
            None => (HashMap::new(), HashSet::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = FinderConfig::default();
        assert!(c.smart_matching);
        assert_eq!(c.max_results, None);
        assert_eq!(c.backend, Backend::Native);
        assert_eq!(c.buffer_search_modifier, "%");
        assert_eq!(c.project_search_modifier, "#");
    }

    #[test]
    fn test_partial_json() {
        let c = FinderConfig::from_json(r#"{"max_results": 5, "backend": "reference"}"#).unwrap();
        assert_eq!(c.max_results, Some(5));
        assert_eq!(c.backend, Backend::Reference);
        assert!(c.smart_matching);
    }

    #[test]
    fn test_kinds_for_filetype() {
        let c = FinderConfig::from_json(
            r#"{"types": {"python": {"kinds_map": {"c": "class"}, "exclude_kinds": ["v"]}}}"#,
        )
        .unwrap();
        let (kinds, exclude) = c.kinds_for(Some("python"));
        assert_eq!(kinds.get("c").map(String::as_str), Some("class"));
        assert!(exclude.contains("v"));

        let (kinds, exclude) = c.kinds_for(Some("rust"));
        assert!(kinds.is_empty() && exclude.is_empty());
        assert!(c.kinds_for(None).0.is_empty());
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            FinderConfig::from_json("{\"max_results\": \"ten\"}"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_modifier_clash() {
        let err = FinderConfig::from_json(
            r#"{"buffer_search_modifier": "@", "project_search_modifier": "@"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::ModifierClash(m) if m == "@"));
    }
}
