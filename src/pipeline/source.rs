//! Manifest sources
//!
//! The pipeline only needs two things from the outside world: the list of
//! manifest paths and the bytes behind each one.

use std::path::{Path, PathBuf};

#[cfg(test)]
use mockall::automock;
use walkdir::WalkDir;

use crate::{Error, Result};

/// File extensions treated as manifests
pub const MANIFEST_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// Supplies manifest files to the pipeline
///
/// This trait abstracts filesystem access for testability.
#[cfg_attr(test, automock)]
pub trait ManifestSource {
    /// Manifest paths, in the order they must be processed
    fn list(&self) -> Result<Vec<PathBuf>>;

    /// Raw bytes of one manifest
    fn read(&self, path: &Path) -> Result<Vec<u8>>;
}

/// Recursive directory walk over the local filesystem
#[derive(Clone, Debug)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    /// Walk `root` and everything below it
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ManifestSource for FsSource {
    /// Every manifest under the root, sorted by path so that output does not
    /// depend on directory iteration order
    fn list(&self) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for entry in WalkDir::new(&self.root).follow_links(true) {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(&self.root).to_path_buf();
                Error::io(path, e.into())
            })?;
            if entry.file_type().is_file() && is_manifest(entry.path()) {
                paths.push(entry.into_path());
            }
        }
        paths.sort();
        Ok(paths)
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        std::fs::read(path).map_err(|e| Error::io(path, e))
    }
}

/// Whether `path` carries a manifest extension
pub fn is_manifest(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| MANIFEST_EXTENSIONS.contains(&ext))
}
