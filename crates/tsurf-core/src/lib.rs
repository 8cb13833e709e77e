//! tsurf Core Engine
//!
//! Fuzzy tag search for editors: a subsequence matcher with a
//! boundary-aware similarity score, implemented by two backends that are
//! required to agree on every input.
//!
//! # Features
//!
//! - `native` - Enable all native optimizations (SIMD, parallel)
//! - `simd` - memchr-accelerated byte scan in the native backend
//! - `parallel` - Parallel ranking via rayon for large tag lists
//!
//! # Example
//!
//! ```rust
//! use tsurf_core::{parse_tags, search, Ranker};
//! use std::collections::{HashMap, HashSet};
//!
//! let m = search("sul", "superLong_identifier", false);
//! assert_eq!(m.positions, vec![0, 1, 5]);
//!
//! let tags = parse_tags(
//!     "Finder\tfinder.py\t18;\"\tc\nfind_tags\tfinder.py\t58;\"\tm\n",
//!     &HashMap::new(),
//!     &HashSet::new(),
//! );
//! let ranked = Ranker::default().rank("fin", &tags, None);
//! assert_eq!(ranked[0].tag.name, "Finder");
//! ```

pub mod cache;
pub mod config;
pub mod rank;
pub mod scope;
pub mod search;
pub mod tags;

// Re-export main types at crate root
pub use cache::{CacheKey, TagCache};
pub use config::{ConfigError, FileTypeConfig, FinderConfig};
pub use rank::{Ranker, TagMatch};
pub use scope::{ScopedQuery, SearchScope};
pub use search::{search, Backend, MatchResult, NO_MATCH, SCORE_TOLERANCE};
pub use tags::{parse_tag_line, parse_tags, Tag, TagParseError};
