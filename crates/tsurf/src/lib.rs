//! # tsurf command line
//!
//! Library half of the `tsurf` binary: config loading, tag input and
//! result formatting. `main.rs` only parses arguments and wires these up.

pub mod app;
pub mod error;
pub mod logging;

pub use app::{format_json, format_text, load_config, read_tags, SearchRequest};
pub use error::{Error, Result};
