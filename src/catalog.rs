//! Building catalog: per-kind, per-level building data.
//!
//! Entries are loaded lazily from a [`CatalogSource`] and cached in a
//! [`Catalog`]. The cache belongs to the caller: create one per run, or one
//! per worker when validating villages in parallel. A catalog that has been
//! fully populated can be shared read-only.

mod entry;
mod source;

pub use entry::{CapacityMap, CatalogEntry, Category, Footprint, LevelRecord, MAX_FOOTPRINT_SIDE};
pub use source::{catalog_file_name, CatalogSource, DirectorySource, MemorySource};

use crate::error::CatalogError;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Kind name of the townhall.
pub const TOWNHALL: &str = "townhall";

/// Caching accessor over a [`CatalogSource`].
#[derive(Debug)]
pub struct Catalog {
    source: Box<dyn CatalogSource + Send + Sync>,
    entries: HashMap<String, Arc<CatalogEntry>>,
}

impl Catalog {
    /// Create an empty cache over `source`.
    #[must_use]
    pub fn new(source: impl CatalogSource + Send + Sync + 'static) -> Self {
        Self {
            source: Box::new(source),
            entries: HashMap::new(),
        }
    }

    /// Create an empty cache over a directory of JSON documents.
    #[must_use]
    pub fn from_dir(root: impl Into<PathBuf>) -> Self {
        Self::new(DirectorySource::new(root))
    }

    /// Entry for `kind`, loading it on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot provide the entry. Nothing is
    /// cached in that case.
    pub fn entry(&mut self, kind: &str) -> Result<Arc<CatalogEntry>, CatalogError> {
        if let Some(entry) = self.entries.get(kind) {
            return Ok(Arc::clone(entry));
        }

        let entry = Arc::new(self.source.load(kind)?);
        tracing::debug!(kind, levels = entry.level_count(), "loaded catalog entry");
        self.entries.insert(kind.to_string(), Arc::clone(&entry));
        Ok(entry)
    }

    /// Already-cached entry for `kind`. Never touches the source.
    #[must_use]
    pub fn get(&self, kind: &str) -> Option<&CatalogEntry> {
        self.entries.get(kind).map(Arc::as_ref)
    }

    /// Seed the cache with an entry, replacing any cached one.
    pub fn insert(&mut self, kind: impl Into<String>, entry: CatalogEntry) {
        self.entries.insert(kind.into(), Arc::new(entry));
    }

    /// Load every kind in `kinds` into the cache.
    ///
    /// # Errors
    ///
    /// Returns the first load failure.
    pub fn preload<I, S>(&mut self, kinds: I) -> Result<(), CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for kind in kinds {
            self.entry(kind.as_ref())?;
        }
        Ok(())
    }

    /// Whether `kind` is cached.
    #[must_use]
    pub fn contains(&self, kind: &str) -> bool {
        self.entries.contains_key(kind)
    }

    /// Number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cached townhall record for `level`.
    #[must_use]
    pub fn townhall_level(&self, level: u32) -> Option<&LevelRecord> {
        self.get(TOWNHALL)?.level(level)
    }
}
