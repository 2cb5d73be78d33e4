//! Content loaders: resolve an opaque source handle to its full text.
//!
//! The diff engine never loads anything itself; the orchestrator and the
//! single-compare path go through a [`ContentLoader`].

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use logdiff_core::{types::DiffResult, LoadError};

use crate::diff::compare_text;

/// Supplies the full text of one source.
pub trait ContentLoader {
    fn load(&self, source: &Path) -> Result<String, LoadError>;
}

/// Reads sources from the filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLoader {
    lossy: bool,
}

impl FsLoader {
    /// Strict UTF-8: invalid content is a [`LoadError::Decode`].
    pub fn new() -> Self {
        Self { lossy: false }
    }

    /// Replace invalid UTF-8 sequences with U+FFFD instead of failing.
    pub fn lossy() -> Self {
        Self { lossy: true }
    }

    pub fn with_lossy(lossy: bool) -> Self {
        Self { lossy }
    }
}

impl ContentLoader for FsLoader {
    fn load(&self, source: &Path) -> Result<String, LoadError> {
        let bytes = std::fs::read(source).map_err(|err| match err.kind() {
            ErrorKind::NotFound => LoadError::NotFound {
                path: source.to_path_buf(),
            },
            _ => LoadError::Io {
                path: source.to_path_buf(),
                source: err,
            },
        })?;
        decode(source, bytes, self.lossy)
    }
}

fn decode(path: &Path, bytes: Vec<u8>, lossy: bool) -> Result<String, LoadError> {
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(err) if lossy => {
            tracing::debug!("lossy UTF-8 decode for {}", path.display());
            Ok(String::from_utf8_lossy(err.as_bytes()).into_owned())
        }
        Err(err) => Err(LoadError::Decode {
            path: path.to_path_buf(),
            source: err.utf8_error(),
        }),
    }
}

/// Sources held in memory, keyed by handle.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    sources: HashMap<PathBuf, String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, source: impl Into<PathBuf>, content: impl Into<String>) {
        self.sources.insert(source.into(), content.into());
    }

    pub fn with(mut self, source: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.insert(source, content);
        self
    }
}

impl ContentLoader for MemoryLoader {
    fn load(&self, source: &Path) -> Result<String, LoadError> {
        self.sources
            .get(source)
            .cloned()
            .ok_or_else(|| LoadError::NotFound {
                path: source.to_path_buf(),
            })
    }
}

/// Load both sides and compare them.
///
/// Single-comparison entrypoint: a load failure is returned as-is and no
/// partial result is produced.
pub fn load_and_compare<L: ContentLoader>(
    loader: &L,
    left: &Path,
    right: &Path,
) -> Result<DiffResult, LoadError> {
    let pre = loader.load(left)?;
    let post = loader.load(right)?;
    Ok(compare_text(&pre, &post))
}
