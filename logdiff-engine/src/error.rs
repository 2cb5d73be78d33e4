//! Error types for logdiff-engine.

use std::path::PathBuf;

use thiserror::Error;

use logdiff_core::ConfigError;

/// Errors raised while discovering inputs for a batch.
///
/// Per-task load failures never surface here; they become `Failed` tasks.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Invalid pairing configuration.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// An I/O error while walking the input directory.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input root is not a directory.
    #[error("not a directory: {path}")]
    NotADirectory { path: PathBuf },
}

/// Convenience constructor for [`EngineError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> EngineError {
    EngineError::Io {
        path: path.into(),
        source,
    }
}
