//! Error types for the tsurf command line.

use std::path::PathBuf;

use thiserror::Error;
use tsurf_core::ConfigError;

/// Command line error type.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A named input could not be read
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias using the tsurf Error.
pub type Result<T> = std::result::Result<T, Error>;
