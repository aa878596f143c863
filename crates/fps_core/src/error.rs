//! Error types for the simulation core.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to load a [`crate::SimConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("could not parse config: {0}")]
    Syntax(#[from] ron::error::SpannedError),

    #[error("invalid config: {0}")]
    Invalid(String),
}
