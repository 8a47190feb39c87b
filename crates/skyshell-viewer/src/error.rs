use std::path::PathBuf;

use skyshell_config::ConfigError;
use skyshell_mesh::MeshError;
use skyshell_scatter::ScatterError;
use thiserror::Error;

/// Everything that can stop the viewer.
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid scattering setup: {0}")]
    Scatter(#[from] ScatterError),

    #[error("invalid sphere mesh: {0}")]
    Mesh(#[from] MeshError),

    #[error("failed to encode PNG {path}")]
    Image {
        path: PathBuf,
        #[source]
        source: png::EncodingError,
    },

    #[error("I/O error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
