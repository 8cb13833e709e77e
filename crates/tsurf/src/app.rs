//! Search pipeline behind the `tsurf` binary
//!
//! Tags are produced elsewhere (`ctags -f -`); this module reads them,
//! resolves the query's scope modifier and ranks.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use tracing::{debug, info};
use tsurf_core::{parse_tags, FinderConfig, Ranker, ScopedQuery, Tag, TagMatch};

use crate::error::{Error, Result};

/// Load a JSON config file, or defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<FinderConfig> {
    let Some(path) = path else {
        return Ok(FinderConfig::default());
    };
    let json = fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = FinderConfig::from_json(&json)?;
    debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Read raw tags text from a file, or stdin when `path` is `-`.
pub fn read_tags(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// One query against one tags file
#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    /// Raw user input, possibly prefixed with a scope modifier
    pub input: String,
    pub filetype: Option<String>,
    pub cursor_line: Option<usize>,
}

impl SearchRequest {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            ..Self::default()
        }
    }

    pub fn with_filetype(mut self, filetype: Option<String>) -> Self {
        self.filetype = filetype;
        self
    }

    pub fn with_cursor_line(mut self, line: Option<usize>) -> Self {
        self.cursor_line = line;
        self
    }

    /// Parse tags text with this request's filetype settings
    pub fn parse(&self, config: &FinderConfig, text: &str) -> Vec<Tag> {
        let (kinds, exclude) = config.kinds_for(self.filetype.as_deref());
        parse_tags(text, &kinds, &exclude)
    }

    /// Resolve the scope modifier and rank `tags` against the bare query
    pub fn rank<'t>(
        &self,
        config: &FinderConfig,
        tags: &'t [Tag],
    ) -> (ScopedQuery, Vec<TagMatch<'t>>) {
        // a tags file stands in for the current buffer
        let scoped = ScopedQuery::resolve(&self.input, config, true);
        info!(scope = scoped.scope.as_str(), query = %scoped.query, "searching tags");

        let matches = Ranker::from_config(config).rank(&scoped.query, tags, self.cursor_line);
        (scoped, matches)
    }
}

/// `score<TAB>name<TAB>file<TAB>excmd`, one line per match
pub fn format_text(matches: &[TagMatch<'_>]) -> String {
    let mut out = String::new();
    for m in matches {
        out.push_str(&format!(
            "{:.4}\t{}\t{}\t{}\n",
            m.score, m.tag.name, m.tag.file, m.tag.excmd
        ));
    }
    out
}

pub fn format_json(matches: &[TagMatch<'_>]) -> Result<String> {
    Ok(serde_json::to_string_pretty(matches)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tsurf_core::SearchScope;

    const TAGS: &str = "!_TAG_FILE_SORTED\t1\t/0=unsorted/\n\
                        Finder\tfinder.py\t/^class Finder:$/;\"\tc\tline:18\n\
                        find_tags\tfinder.py\t/^def find_tags(/;\"\tf\tline:58\n\
                        MAX\tfinder.py\t12;\"\tv\n";

    #[test]
    fn test_scope_modifier_is_stripped() {
        let config = FinderConfig::default();
        let req = SearchRequest::new("#fin");
        let tags = req.parse(&config, TAGS);
        let (scoped, matches) = req.rank(&config, &tags);

        assert_eq!(scoped.scope, SearchScope::Project);
        assert_eq!(scoped.query, "fin");
        let names: Vec<_> = matches.iter().map(|m| m.tag.name.as_str()).collect();
        assert_eq!(names, vec!["Finder", "find_tags"]);
    }

    #[test]
    fn test_filetype_exclusions_apply() {
        let config = FinderConfig::from_json(
            r#"{"types": {"python": {"kinds_map": {"v": "variable"}, "exclude_kinds": ["variable"]}}}"#,
        )
        .unwrap();
        let req = SearchRequest::new("").with_filetype(Some("python".into()));
        assert_eq!(req.parse(&config, TAGS).len(), 2);
        assert_eq!(SearchRequest::new("").parse(&config, TAGS).len(), 3);
    }

    #[test]
    fn test_empty_query_orders_by_cursor() {
        let config = FinderConfig::default();
        let req = SearchRequest::new("").with_cursor_line(Some(14));
        let tags = req.parse(&config, TAGS);
        let (scoped, matches) = req.rank(&config, &tags);

        assert_eq!(scoped.scope, SearchScope::CurrentBuffer);
        let names: Vec<_> = matches.iter().map(|m| m.tag.name.as_str()).collect();
        assert_eq!(names, vec!["MAX", "Finder", "find_tags"]);
    }

    #[test]
    fn test_format_text_columns() {
        let config = FinderConfig::default();
        let req = SearchRequest::new("find");
        let tags = req.parse(&config, TAGS);
        let (_, matches) = req.rank(&config, &tags);

        let text = format_text(&matches);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let fields: Vec<_> = lines[0].split('\t').collect();
        assert_eq!(&fields[1..], &["Finder", "finder.py", "/^class Finder:$/"]);
        assert!(fields[0].parse::<f64>().unwrap() > 0.0);
    }

    #[test]
    fn test_format_json_shape() {
        let config = FinderConfig::default();
        let req = SearchRequest::new("MAX");
        let tags = req.parse(&config, TAGS);
        let (_, matches) = req.rank(&config, &tags);

        let json: serde_json::Value = serde_json::from_str(&format_json(&matches).unwrap()).unwrap();
        assert_eq!(json[0]["tag"]["name"], "MAX");
        assert_eq!(json[0]["positions"], serde_json::json!([0, 1, 2]));
    }

    #[test]
    fn test_missing_tags_file() {
        let err = read_tags(Path::new("/nonexistent/tsurf/tags")).unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
        assert!(err.to_string().starts_with("failed to read /nonexistent/tsurf/tags"));
    }
}
