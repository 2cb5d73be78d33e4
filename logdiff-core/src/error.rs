//! Error types for logdiff-core.

use std::path::PathBuf;

use thiserror::Error;

/// A source could not be read or decoded.
///
/// In batch mode this becomes a `Failed` task; in single-comparison mode it is
/// reported once to the user.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The source does not exist.
    #[error("source not found: {path}")]
    NotFound { path: PathBuf },

    /// Underlying I/O failure other than not-found.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The content is not valid UTF-8 and lossy decoding is disabled.
    #[error("{path} is not valid UTF-8: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: std::str::Utf8Error,
    },
}

impl LoadError {
    /// Path of the source that failed.
    pub fn path(&self) -> &PathBuf {
        match self {
            LoadError::NotFound { path }
            | LoadError::Io { path, .. }
            | LoadError::Decode { path, .. } => path,
        }
    }
}

/// Errors that can arise while loading the YAML configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file exists but could not be read.
    #[error("failed to read config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error, with file path and serde_yaml's line context.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A configured regular expression does not compile.
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The key pattern has no `key` capture group.
    #[error("key pattern '{pattern}' must contain a named group `(?P<key>...)`")]
    MissingKeyGroup { pattern: String },

    /// An explicitly requested config file is absent.
    #[error("config not found at {path}")]
    NotFound { path: PathBuf },
}
