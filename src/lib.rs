// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Bastion: validates village layouts against per-townhall construction rules.
//!
//! A village snapshot lists raw building placements. The resolver expands
//! them into positioned [`Structure`]s using the building catalog, and the
//! validator checks those structures against the capacity tables of the
//! village's townhall.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   CLI: check / view / batch         │
//! ├─────────────────────────────────────┤
//! │   audit: load → resolve → validate  │
//! ├──────────────────┬──────────────────┤
//! │  structure       │  validate        │
//! ├──────────────────┴──────────────────┤
//! │   catalog (cached per run)          │
//! └─────────────────────────────────────┘
//! ```

pub mod audit;
pub mod catalog;
pub mod config;
pub mod error;
pub mod render;
pub mod structure;
pub mod validate;
pub mod village;

pub use error::{AuditError, CatalogError, LoadError, ResolveError};

// Re-export the core pipeline at crate root for convenience
pub use audit::{audit_village, Audit};
pub use catalog::{Catalog, CatalogEntry, TOWNHALL};
pub use config::WorldConfig;
pub use structure::{resolve, Structure};
pub use validate::{validate, ValidationResult, Warning};
pub use village::{RawBuilding, Village};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MemorySource;

    #[test]
    fn test_empty_village_has_no_townhall() {
        let mut catalog = Catalog::new(MemorySource::new());
        let audit = audit_village(&Village::default(), &mut catalog, 10).unwrap();
        assert!(audit.structures.is_empty());
        assert_eq!(audit.result, ValidationResult::missing_townhall());
    }
}
