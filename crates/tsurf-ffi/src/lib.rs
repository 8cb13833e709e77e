//! tsurf Tag Search Library (C ABI)
//!
//! Exposes tsurf-core to editor hosts through a C interface: one-shot
//! fuzzy search plus a thread-safe finder handle that caches parsed tags
//! and ranks them.
//!
//! ## Usage from C
//!
//! ```c
//! TsurfFinder *finder = tsurf_finder_new(NULL);
//! tsurf_finder_load_tags(finder, ctags_output, "python", 0, files, n_files);
//! TsurfFindResultC r = tsurf_finder_find(finder, "fin", 42, 20);
//! tsurf_find_result_free(r);
//! tsurf_finder_free(finder);
//! ```

pub mod ffi;
mod finder;
mod util;

pub use finder::ThreadSafeFinder;

/// Initialize tracing for the library.
///
/// Safe to call many times; only the first call installs a subscriber.
/// The level is controlled via `RUST_LOG`, e.g. `RUST_LOG=tsurf_core=debug`.
pub fn init_logger() {
    use std::sync::Once;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        // the host may already own a global subscriber
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init();
        tracing::debug!("tsurf tag search library initialized");
    });
}

// Re-export FFI types for C consumers
pub use ffi::{TsurfFindResultC, TsurfLoadResultC, TsurfMatchC, TsurfTagMatchC};
