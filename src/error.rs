//! Error types for catalog loading, file loading and structure resolution.
//!
//! All of these are fatal for a run: a village whose catalog or snapshot
//! cannot be read is never validated. Rule violations are not errors; they
//! are reported as [`Warning`](crate::validate::Warning)s.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading building catalog entries.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file for a kind could not be read.
    #[error("failed to read catalog file {}: {source}", path.display())]
    Io {
        /// Path of the catalog file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The catalog file is not valid catalog JSON.
    #[error("malformed catalog file {}: {source}", path.display())]
    Parse {
        /// Path of the catalog file.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
    /// The source has no entry for this kind.
    #[error("no catalog entry for building kind {0:?}")]
    UnknownKind(String),
    /// The declared footprint is larger than any grid it could be placed on.
    #[error("footprint {width}x{height} exceeds the {max}-cell limit")]
    InvalidFootprint {
        /// Declared width.
        width: u32,
        /// Declared height.
        height: u32,
        /// Largest allowed side.
        max: u32,
    },
    /// A level record inside an entry could not be decoded.
    #[error("invalid level {level:?} record: {reason}")]
    InvalidLevel {
        /// The level key as written in the catalog.
        level: String,
        /// Why the record was rejected.
        reason: String,
    },
}

/// Errors raised while reading the world config or a village snapshot.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Path of the file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The file is not valid JSON of the expected shape.
    #[error("malformed JSON in {}: {source}", path.display())]
    Json {
        /// Path of the file.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
}

/// Errors raised while resolving raw buildings into structures.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The catalog entry for a referenced kind is unavailable.
    #[error("building {kind:?}: {source}")]
    Catalog {
        /// Kind being resolved.
        kind: String,
        /// Catalog failure.
        source: CatalogError,
    },
    /// The catalog has no record for the requested level.
    #[error("building {kind:?} has no catalog data for level {level}")]
    UnknownLevel {
        /// Kind being resolved.
        kind: String,
        /// Requested level.
        level: u32,
    },
    /// The raw building carries no usable position.
    #[error("building {kind:?} has no position (expected {expected})")]
    MissingPosition {
        /// Kind being resolved.
        kind: String,
        /// Which position form was required.
        expected: &'static str,
    },
}

/// Any failure of the load → resolve pipeline.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Snapshot or config loading failed.
    #[error(transparent)]
    Load(#[from] LoadError),
    /// Structure resolution failed.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}
