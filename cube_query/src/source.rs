// Copyright 2026 the Cube Loader Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Where manifest and level documents come from.

use std::future::{self, Future};
use std::io;
use std::path::{Component, Path, PathBuf};

use hashbrown::HashMap;

use crate::error::FetchError;

/// Asynchronous access to scene documents by path.
///
/// The loader awaits one fetch at a time, so implementations do not need to
/// be thread-safe. Transport concerns such as retries, timeouts and
/// decompression belong here, not in the loader.
pub trait DocumentSource {
    /// Fetch the text of the document at `path`.
    fn fetch(&self, path: &str) -> impl Future<Output = Result<String, FetchError>>;
}

impl<S: DocumentSource + ?Sized> DocumentSource for &S {
    fn fetch(&self, path: &str) -> impl Future<Output = Result<String, FetchError>> {
        (**self).fetch(path)
    }
}

/// Documents held in memory, keyed by path.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    documents: HashMap<String, String>,
}

impl MemorySource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the document at `path`.
    pub fn insert(&mut self, path: impl Into<String>, text: impl Into<String>) {
        self.documents.insert(path.into(), text.into());
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, path: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(path, text);
        self
    }

    /// Remove the document at `path`, returning its text.
    pub fn remove(&mut self, path: &str) -> Option<String> {
        self.documents.remove(path)
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the source holds no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentSource for MemorySource {
    fn fetch(&self, path: &str) -> impl Future<Output = Result<String, FetchError>> {
        let result = self
            .documents
            .get(path)
            .cloned()
            .ok_or_else(|| FetchError::NotFound {
                path: path.to_owned(),
            });
        future::ready(result)
    }
}

/// Documents stored as files under a root directory.
///
/// Paths are resolved relative to the root. Absolute paths and `..`
/// segments are refused with [`FetchError::OutsideRoot`]. Reads are blocking;
/// the returned future is already complete when polled.
#[derive(Clone, Debug)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Create a source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read(&self, path: &str) -> Result<String, FetchError> {
        let relative = Path::new(path)
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !relative {
            return Err(FetchError::OutsideRoot {
                path: path.to_owned(),
            });
        }
        std::fs::read_to_string(self.root.join(path)).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                FetchError::NotFound {
                    path: path.to_owned(),
                }
            } else {
                FetchError::Io {
                    path: path.to_owned(),
                    source,
                }
            }
        })
    }
}

impl DocumentSource for DirectorySource {
    fn fetch(&self, path: &str) -> impl Future<Output = Result<String, FetchError>> {
        future::ready(self.read(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_source_fetches_and_misses() {
        let source = MemorySource::new().with("a.json", "{}");
        assert_eq!(source.len(), 1);
        assert_eq!(pollster::block_on(source.fetch("a.json")).unwrap(), "{}");
        let err = pollster::block_on(source.fetch("b.json")).unwrap_err();
        assert!(matches!(err, FetchError::NotFound { ref path } if path == "b.json"));
    }

    #[test]
    fn directory_source_reads_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("levels")).unwrap();
        std::fs::write(dir.path().join("levels/v1.json"), "{\"x\":1}").unwrap();

        let source = DirectorySource::new(dir.path());
        let text = pollster::block_on(source.fetch("levels/v1.json")).unwrap();
        assert_eq!(text, "{\"x\":1}");

        let missing = pollster::block_on(source.fetch("levels/v2.json")).unwrap_err();
        assert!(matches!(missing, FetchError::NotFound { .. }));

        // Reading a directory as a file is an I/O error, not a miss.
        let dir_err = pollster::block_on(source.fetch("levels")).unwrap_err();
        assert!(matches!(dir_err, FetchError::Io { .. }));
    }

    #[test]
    fn directory_source_stays_under_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("root")).unwrap();
        std::fs::write(dir.path().join("secret.json"), "{}").unwrap();
        std::fs::write(dir.path().join("root/ok.json"), "{}").unwrap();

        let source = DirectorySource::new(dir.path().join("root"));
        assert_eq!(pollster::block_on(source.fetch("./ok.json")).unwrap(), "{}");

        let absolute = dir.path().join("secret.json");
        for path in ["../secret.json", "sub/../../secret.json", absolute.to_str().unwrap()] {
            let err = pollster::block_on(source.fetch(path)).unwrap_err();
            assert!(matches!(err, FetchError::OutsideRoot { .. }), "{path}: {err}");
        }
    }

    #[test]
    fn borrowed_sources_forward() {
        let source = MemorySource::new().with("m", "text");
        let by_ref = &source;
        assert_eq!(pollster::block_on(by_ref.fetch("m")).unwrap(), "text");
    }
}
