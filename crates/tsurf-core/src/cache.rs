//! Caller-owned tag cache
//!
//! Holds the tags from the last generation run so repeated searches in the
//! same scope skip regenerating them. The cache is keyed by the scope and
//! its file list: a key change is a miss, and `invalidate` forces a
//! rebuild. Matching itself never touches the cache.

use std::hash::{Hash, Hasher};

use ahash::AHasher;
use tracing::debug;

use crate::scope::SearchScope;
use crate::tags::Tag;

/// Fingerprint of a scope and the files it covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey(u64);

impl CacheKey {
    pub fn new<I, S>(scope: SearchScope, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut hasher = AHasher::default();
        scope.hash(&mut hasher);
        for f in files {
            f.as_ref().hash(&mut hasher);
        }
        Self(hasher.finish())
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Tags of the last generation, tagged with the key they were built for
#[derive(Debug, Default)]
pub struct TagCache {
    entry: Option<(CacheKey, Vec<Tag>)>,
    generation: u64,
}

impl TagCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached tags for `key`, or `None` on a miss
    pub fn get(&self, key: CacheKey) -> Option<&[Tag]> {
        match &self.entry {
            Some((k, tags)) if *k == key => Some(tags),
            _ => None,
        }
    }

    /// Any cached tags, regardless of key
    pub fn current(&self) -> Option<&[Tag]> {
        self.entry.as_ref().map(|(_, tags)| tags.as_slice())
    }

    /// Replace the cached tags
    pub fn store(&mut self, key: CacheKey, tags: Vec<Tag>) {
        self.generation += 1;
        debug!(key = %key, tags = tags.len(), generation = self.generation, "tag cache stored");
        self.entry = Some((key, tags));
    }

    /// Return cached tags for `key`, generating and storing them on a miss
    pub fn get_or_try_insert_with<E, F>(&mut self, key: CacheKey, generate: F) -> Result<&[Tag], E>
    where
        F: FnOnce() -> Result<Vec<Tag>, E>,
    {
        if self.get(key).is_none() {
            let tags = generate()?;
            self.store(key, tags);
        }
        Ok(self.current().unwrap_or_default())
    }

    /// Drop cached tags so the next lookup regenerates
    pub fn invalidate(&mut self) {
        if self.entry.take().is_some() {
            debug!(generation = self.generation, "tag cache invalidated");
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entry.as_ref().map_or(true, |(_, tags)| tags.is_empty())
    }

    /// Number of stores since creation
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn tag(name: &str) -> Tag {
        Tag {
            name: name.to_string(),
            file: "a.rs".to_string(),
            excmd: "1".to_string(),
            exts: BTreeMap::new(),
        }
    }

    #[test]
    fn test_key_depends_on_scope_and_files() {
        let a = CacheKey::new(SearchScope::Project, ["a.rs", "b.rs"]);
        let b = CacheKey::new(SearchScope::Project, ["a.rs", "b.rs"]);
        let c = CacheKey::new(SearchScope::OpenBuffers, ["a.rs", "b.rs"]);
        let d = CacheKey::new(SearchScope::Project, ["a.rs"]);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
        assert_eq!(a.to_string().len(), 16);
    }

    #[test]
    fn test_hit_and_scope_change_miss() {
        let key = CacheKey::new(SearchScope::CurrentBuffer, ["main.rs"]);
        let other = CacheKey::new(SearchScope::Project, ["main.rs", "lib.rs"]);

        let mut cache = TagCache::new();
        assert!(cache.get(key).is_none());

        cache.store(key, vec![tag("main")]);
        assert_eq!(cache.get(key).map(<[Tag]>::len), Some(1));
        assert!(cache.get(other).is_none());
        assert_eq!(cache.generation(), 1);
    }

    #[test]
    fn test_invalidate() {
        let key = CacheKey::new(SearchScope::CurrentBuffer, ["main.rs"]);
        let mut cache = TagCache::new();
        cache.store(key, vec![tag("main")]);
        cache.invalidate();
        assert!(cache.get(key).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_get_or_try_insert_with() {
        let key = CacheKey::new(SearchScope::Project, ["x.py"]);
        let mut cache = TagCache::new();
        let mut calls = 0;

        for _ in 0..2 {
            let tags = cache
                .get_or_try_insert_with(key, || {
                    calls += 1;
                    Ok::<_, String>(vec![tag("x"), tag("y")])
                })
                .unwrap();
            assert_eq!(tags.len(), 2);
        }
        assert_eq!(calls, 1);

        let err = cache
            .get_or_try_insert_with(CacheKey::new(SearchScope::Project, ["z.py"]), || {
                Err::<Vec<Tag>, _>("ctags failed".to_string())
            })
            .unwrap_err();
        assert_eq!(err, "ctags failed");
        // a failed generation keeps the previous entry
        assert_eq!(cache.get(key).map(<[Tag]>::len), Some(2));
    }
}
