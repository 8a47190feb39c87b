//! Configuration error types.

use std::path::PathBuf;

/// Errors raised while locating, loading, or saving `config.ron`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The OS does not expose a per-user configuration directory.
    #[error("no per-user configuration directory is available on this platform")]
    NoConfigDir,

    /// Reading the config file failed.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing the config file (or creating its directory) failed.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid RON for [`Config`](crate::Config).
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    /// Serializing the config to RON failed.
    #[error("failed to serialize config: {0}")]
    Serialize(#[source] ron::Error),
}
