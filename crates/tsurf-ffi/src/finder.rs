//! Thread-safe finder behind the C handle

use parking_lot::RwLock;
use tracing::debug;
use tsurf_core::{parse_tags, CacheKey, FinderConfig, Ranker, Tag, TagCache};

/// A ranked tag detached from the cache lock
#[derive(Debug, Clone)]
pub struct FoundTag {
    pub name: String,
    pub file: String,
    pub excmd: String,
    pub kind: Option<String>,
    pub line: Option<usize>,
    pub score: f64,
    pub positions: Vec<usize>,
}

/// Tag cache plus ranking settings, shareable across host threads
pub struct ThreadSafeFinder {
    config: FinderConfig,
    cache: RwLock<TagCache>,
}

impl Default for ThreadSafeFinder {
    fn default() -> Self {
        Self::new(FinderConfig::default())
    }
}

impl ThreadSafeFinder {
    pub fn new(config: FinderConfig) -> Self {
        Self {
            config,
            cache: RwLock::new(TagCache::new()),
        }
    }

    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Parse ctags output and store it under `key`. Returns the tag count.
    pub fn load_tags(&self, text: &str, filetype: Option<&str>, key: CacheKey) -> usize {
        let (kinds, exclude) = self.config.kinds_for(filetype);
        let tags = parse_tags(text, &kinds, &exclude);
        let count = tags.len();
        self.cache.write().store(key, tags);
        count
    }

    pub fn has_tags(&self, key: CacheKey) -> bool {
        self.cache.read().get(key).is_some()
    }

    pub fn invalidate(&self) {
        self.cache.write().invalidate();
    }

    /// Rank whatever tags were loaded last, regardless of their key.
    ///
    /// Use [`find_in`](Self::find_in) when the host may have switched scope
    /// without reloading. `max_results` overrides the configured cap.
    pub fn find(
        &self,
        query: &str,
        cursor_line: Option<usize>,
        max_results: Option<usize>,
    ) -> Vec<FoundTag> {
        let cache = self.cache.read();
        let Some(tags) = cache.current() else {
            debug!("find on empty tag cache");
            return Vec::new();
        };
        self.rank(tags, query, cursor_line, max_results)
    }

    /// Rank the tags cached under `key`; `None` when they are not loaded.
    pub fn find_in(
        &self,
        key: CacheKey,
        query: &str,
        cursor_line: Option<usize>,
        max_results: Option<usize>,
    ) -> Option<Vec<FoundTag>> {
        let cache = self.cache.read();
        let Some(tags) = cache.get(key) else {
            debug!(%key, "find on stale or empty tag cache");
            return None;
        };
        Some(self.rank(tags, query, cursor_line, max_results))
    }

    fn rank(
        &self,
        tags: &[Tag],
        query: &str,
        cursor_line: Option<usize>,
        max_results: Option<usize>,
    ) -> Vec<FoundTag> {
        let ranker = Ranker::from_config(&self.config)
            .with_max_results(max_results.or(self.config.max_results));

        ranker
            .rank(query, tags, cursor_line)
            .into_iter()
            .map(|m| FoundTag {
                name: m.tag.name.clone(),
                file: m.tag.file.clone(),
                excmd: m.tag.excmd.clone(),
                kind: m.tag.kind().map(str::to_string),
                line: m.tag.line(),
                score: m.score,
                positions: m.positions,
            })
            .collect()
    }
}
