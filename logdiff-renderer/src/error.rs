//! Error types for logdiff-renderer.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from rendering or writing reports.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Tera template engine error.
    #[error("template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// JSON serialization error (tera context or JSON report).
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// CSV report encoding error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Filesystem error while loading user templates or writing a report.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`RenderError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io {
        path: path.into(),
        source,
    }
}
