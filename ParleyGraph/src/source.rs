//! Dialogue document sources
//!
//! A [`DialogueSource`] enumerates named documents and hands back their raw
//! text. The document name is the file stem for [`DirectorySource`] and the
//! insertion key for [`MemorySource`].

use crate::error::{Error, Result};
use indexmap::IndexMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Default file extension for dialogue documents
pub const DEFAULT_EXTENSION: &str = "json";

/// A place dialogue documents can be read from
pub trait DialogueSource: Send {
    /// Names of every available document, sorted. Rescans the source.
    ///
    /// # Errors
    /// Returns an error if the source cannot be enumerated.
    fn names(&mut self) -> Result<Vec<String>>;

    /// Raw text of one document
    ///
    /// # Errors
    /// Returns [`Error::DocumentNotFound`] if no document has this name.
    fn read(&self, name: &str) -> Result<String>;
}

/// Documents stored as files under a directory tree
///
/// The tree is walked by [`names`](DialogueSource::names); reads go through
/// the name index built by the last walk.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    extension: String,
    index: Option<IndexMap<String, PathBuf>>,
}

impl DirectorySource {
    /// Source reading `*.json` files under `root`
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self::with_extension(root, DEFAULT_EXTENSION)
    }

    /// Source reading files with the given extension under `root`
    pub fn with_extension<P: AsRef<Path>>(root: P, extension: &str) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            extension: extension.trim_start_matches('.').to_string(),
            index: None,
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map of document name to path. The first path in sorted order wins
    /// when two files share a stem.
    fn scan(&self) -> Result<IndexMap<String, PathBuf>> {
        let mut paths = Vec::new();
        for entry in WalkDir::new(&self.root).follow_links(true) {
            let entry = entry?;
            let path = entry.path();
            if path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.extension))
            {
                paths.push(path.to_path_buf());
            }
        }
        paths.sort();

        let mut index: IndexMap<String, PathBuf> = IndexMap::new();
        for path in paths {
            let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
                continue;
            };
            if let Some(existing) = index.get(&stem) {
                tracing::warn!(
                    "Duplicate dialogue name '{}': keeping {}, ignoring {}",
                    stem,
                    existing.display(),
                    path.display()
                );
                continue;
            }
            index.insert(stem, path);
        }
        index.sort_keys();
        Ok(index)
    }
}

impl DialogueSource for DirectorySource {
    fn names(&mut self) -> Result<Vec<String>> {
        let index = self.scan()?;
        let names = index.keys().cloned().collect();
        self.index = Some(index);
        Ok(names)
    }

    fn read(&self, name: &str) -> Result<String> {
        let path = match &self.index {
            Some(index) => index.get(name).cloned(),
            None => self.scan()?.swap_remove(name),
        }
        .ok_or_else(|| Error::DocumentNotFound(name.to_string()))?;
        tracing::debug!("Reading dialogue '{}' from {}", name, path.display());
        Ok(fs::read_to_string(path)?)
    }
}

/// Documents held in memory, mostly for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: IndexMap<String, String>,
}

impl MemorySource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a document
    pub fn insert(&mut self, name: impl Into<String>, content: impl Into<String>) {
        self.documents.insert(name.into(), content.into());
    }

    /// Builder-style [`insert`](Self::insert)
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(name, content);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DialogueSource for MemorySource {
    fn names(&mut self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self.documents.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    fn read(&self, name: &str) -> Result<String> {
        self.documents
            .get(name)
            .cloned()
            .ok_or_else(|| Error::DocumentNotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_directory_source_names_by_stem() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b_merchant.json"), "{}").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        fs::create_dir(dir.path().join("act1")).unwrap();
        fs::write(dir.path().join("act1").join("a_guard.JSON"), "{\"x\":1}").unwrap();

        let mut source = DirectorySource::new(dir.path());
        assert_eq!(source.names().unwrap(), vec!["a_guard", "b_merchant"]);
        assert_eq!(source.read("a_guard").unwrap(), "{\"x\":1}");
        assert!(matches!(
            source.read("notes"),
            Err(Error::DocumentNotFound(name)) if name == "notes"
        ));
    }

    #[test]
    fn test_directory_source_custom_extension() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("intro.dlg"), "{}").unwrap();
        fs::write(dir.path().join("other.json"), "{}").unwrap();

        let mut source = DirectorySource::with_extension(dir.path(), ".dlg");
        assert_eq!(source.names().unwrap(), vec!["intro"]);
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        let mut source = DirectorySource::new(dir.path().join("nope"));
        assert!(source.names().is_err());
    }

    #[test]
    fn test_reads_use_the_last_scan() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("guard.json"), "{}").unwrap();

        // Without a scan, a read walks the tree itself
        let mut source = DirectorySource::new(dir.path());
        assert_eq!(source.read("guard").unwrap(), "{}");

        assert_eq!(source.names().unwrap(), vec!["guard"]);
        fs::write(dir.path().join("late.json"), "{}").unwrap();
        assert!(matches!(source.read("late"), Err(Error::DocumentNotFound(_))));

        // Content changes show through; only the name index is kept
        fs::write(dir.path().join("guard.json"), "{\"v\":2}").unwrap();
        assert_eq!(source.read("guard").unwrap(), "{\"v\":2}");

        assert_eq!(source.names().unwrap(), vec!["guard", "late"]);
        assert_eq!(source.read("late").unwrap(), "{}");
    }

    #[test]
    fn test_memory_source() {
        let mut source = MemorySource::new().with("zeta", "{}").with("alpha", "[]");
        assert_eq!(source.len(), 2);
        assert_eq!(source.names().unwrap(), vec!["alpha", "zeta"]);
        assert_eq!(source.read("alpha").unwrap(), "[]");
        assert!(source.read("beta").is_err());
    }
}
