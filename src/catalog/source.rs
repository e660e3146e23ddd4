//! Where catalog entries come from.

use super::CatalogEntry;
use crate::error::CatalogError;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// A provider of catalog entries, queried once per kind by [`Catalog`](super::Catalog).
pub trait CatalogSource: fmt::Debug {
    /// Load the entry for `kind`.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry does not exist or cannot be decoded.
    fn load(&self, kind: &str) -> Result<CatalogEntry, CatalogError>;
}

/// File name of the catalog document for `kind`.
///
/// Kind names are lowercased and spaces become underscores:
/// `"Army Camp"` → `army_camp.json`.
#[must_use]
pub fn catalog_file_name(kind: &str) -> String {
    format!("{}.json", kind.to_lowercase().replace(' ', "_"))
}

/// A directory holding one JSON document per building kind.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Create a source reading from `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The catalog directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the document for `kind`.
    #[must_use]
    pub fn path_for(&self, kind: &str) -> PathBuf {
        self.root.join(catalog_file_name(kind))
    }
}

impl CatalogSource for DirectorySource {
    fn load(&self, kind: &str) -> Result<CatalogEntry, CatalogError> {
        let path = self.path_for(kind);
        let text = fs::read_to_string(&path).map_err(|source| CatalogError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| CatalogError::Parse { path, source })
    }
}

/// A fixed in-memory table of entries.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    entries: HashMap<String, CatalogEntry>,
}

impl MemorySource {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry (builder style).
    #[must_use]
    pub fn with_entry(mut self, kind: impl Into<String>, entry: CatalogEntry) -> Self {
        self.insert(kind, entry);
        self
    }

    /// Add or replace an entry.
    pub fn insert(&mut self, kind: impl Into<String>, entry: CatalogEntry) {
        self.entries.insert(kind.into(), entry);
    }
}

impl CatalogSource for MemorySource {
    fn load(&self, kind: &str) -> Result<CatalogEntry, CatalogError> {
        self.entries
            .get(kind)
            .cloned()
            .ok_or_else(|| CatalogError::UnknownKind(kind.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, Footprint};
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_file_name_from_kind() {
        assert_eq!(catalog_file_name("army camp"), "army_camp.json");
        assert_eq!(catalog_file_name("Gold Mine"), "gold_mine.json");
        assert_eq!(catalog_file_name("townhall"), "townhall.json");
    }

    #[test]
    fn test_directory_source_reads_entry() {
        let dir = tempdir().unwrap();
        let mut file = fs::File::create(dir.path().join("army_camp.json")).unwrap();
        write!(
            file,
            r#"{{"size": {{"width": 4, "height": 4}}, "max count": 4, "type": "army", "1": {{}}}}"#
        )
        .unwrap();

        let source = DirectorySource::new(dir.path());
        let entry = source.load("army camp").unwrap();
        assert_eq!(entry.size, Footprint::new(4, 4));
        assert_eq!(entry.category, Category::Army);
        assert!(entry.level(1).is_some());
    }

    #[test]
    fn test_directory_source_missing_file() {
        let dir = tempdir().unwrap();
        let source = DirectorySource::new(dir.path());
        let err = source.load("cannon").unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
        assert!(err.to_string().contains("cannon.json"));
    }

    #[test]
    fn test_directory_source_malformed_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("cannon.json"), "{ not json").unwrap();
        let err = DirectorySource::new(dir.path()).load("cannon").unwrap_err();
        assert!(matches!(err, CatalogError::Parse { .. }));
    }

    #[test]
    fn test_memory_source_unknown_kind() {
        let source = MemorySource::new()
            .with_entry("wall", CatalogEntry::new(Footprint::new(1, 1), Category::Defense));
        assert!(source.load("wall").is_ok());
        assert!(matches!(
            source.load("tower"),
            Err(CatalogError::UnknownKind(kind)) if kind == "tower"
        ));
    }
}
