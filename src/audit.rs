//! Load → resolve → validate, for one village or many.
//!
//! Batch audits run on the rayon pool. Each worker owns its catalog cache,
//! so no cache is ever populated from two threads.

use crate::catalog::Catalog;
use crate::error::{AuditError, ResolveError};
use crate::structure::{resolve, Structure};
use crate::validate::{validate, ValidationResult};
use crate::village::Village;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Resolved structures of a village and their validation result.
#[derive(Debug, Clone, PartialEq)]
pub struct Audit {
    /// Resolved structures, in snapshot order.
    pub structures: Vec<Structure>,
    /// Validation verdict and warnings.
    pub result: ValidationResult,
}

/// Resolve and validate a village.
///
/// # Errors
///
/// Returns an error if any building cannot be resolved.
pub fn audit_village(
    village: &Village,
    catalog: &mut Catalog,
    cell_size: u32,
) -> Result<Audit, ResolveError> {
    let structures = resolve(&village.buildings, catalog, cell_size)?;
    let result = validate(&structures, catalog);
    Ok(Audit { structures, result })
}

/// Load, resolve and validate a village snapshot file.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be loaded or resolved.
pub fn audit_file(path: &Path, catalog: &mut Catalog, cell_size: u32) -> Result<Audit, AuditError> {
    let village = Village::load(path)?;
    Ok(audit_village(&village, catalog, cell_size)?)
}

/// Audit outcome of one snapshot file in a batch.
#[derive(Debug)]
pub struct FileAudit {
    /// Snapshot path.
    pub path: PathBuf,
    /// Audit, or the fatal error that stopped it.
    pub outcome: Result<Audit, AuditError>,
}

impl FileAudit {
    /// Whether the file was audited and found valid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.outcome.as_ref().is_ok_and(|audit| audit.result.is_valid())
    }
}

/// Audit many snapshot files in parallel against a catalog directory.
///
/// Results are returned in input order. A failing file does not stop the
/// others.
#[must_use]
pub fn audit_files(paths: &[PathBuf], catalog_dir: &Path, cell_size: u32) -> Vec<FileAudit> {
    audit_files_with(paths, || Catalog::from_dir(catalog_dir), cell_size, |_| {})
}

/// Like [`audit_files`], with a custom catalog per worker and a callback run
/// on the worker as each file finishes.
#[must_use]
pub fn audit_files_with<F, D>(
    paths: &[PathBuf],
    new_catalog: F,
    cell_size: u32,
    on_done: D,
) -> Vec<FileAudit>
where
    F: Fn() -> Catalog + Sync + Send,
    D: Fn(&FileAudit) + Sync + Send,
{
    let audits: Vec<FileAudit> = paths
        .par_iter()
        .map_init(&new_catalog, |catalog, path| {
            let audit = FileAudit {
                path: path.clone(),
                outcome: audit_file(path, catalog, cell_size),
            };
            on_done(&audit);
            audit
        })
        .collect();

    tracing::debug!(
        files = audits.len(),
        valid = audits.iter().filter(|a| a.is_valid()).count(),
        "batch audit finished"
    );
    audits
}
