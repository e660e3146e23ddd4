//! Village validation against the townhall's construction rules.
//!
//! The townhall's level record carries the capacity tables. Every other kind
//! is checked against the summed tables of the current level (ceilings), and
//! against the count tables of the previous level (floors: what must already
//! be built before the townhall could have been upgraded).
//!
//! Rule violations never stop the scan. Each one is recorded as a
//! [`Warning`] and turns the verdict invalid; only a village without a
//! townhall is rejected outright.

use crate::catalog::{CapacityMap, Catalog, TOWNHALL};
use crate::structure::{GridPos, Structure};
use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// A single rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Warning {
    /// A structure sits at the same position as an earlier structure.
    Overlap {
        /// Kind of the later structure.
        kind: String,
        /// The shared top-left cell.
        position: GridPos,
        /// Kind of the structure it collides with.
        other: String,
    },
    /// The kind is missing from every count table of the townhall.
    NotInTownhall {
        /// Offending kind.
        kind: String,
    },
    /// More instances than the townhall allows.
    CountAboveMax {
        /// Offending kind.
        kind: String,
        /// Instances present.
        count: u32,
        /// Combined limit.
        max: u32,
    },
    /// The kind has a count limit but no level limit.
    LevelNotFound {
        /// Offending kind.
        kind: String,
    },
    /// Some instance is above the allowed level.
    LevelAboveMax {
        /// Offending kind.
        kind: String,
        /// Highest level present.
        level: u32,
        /// Combined limit.
        max: u32,
    },
    /// Fewer instances than the previous townhall level already allowed.
    CountBelowMin {
        /// Offending kind.
        kind: String,
        /// Instances present.
        count: u32,
        /// Required minimum.
        min: u32,
    },
}

impl Warning {
    /// The building kind the warning is about.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::Overlap { kind, .. }
            | Self::NotInTownhall { kind }
            | Self::CountAboveMax { kind, .. }
            | Self::LevelNotFound { kind }
            | Self::LevelAboveMax { kind, .. }
            | Self::CountBelowMin { kind, .. } => kind,
        }
    }

    /// Whether this warning makes the village invalid.
    ///
    /// A missing level limit is reported but tolerated.
    #[must_use]
    pub fn invalidates(&self) -> bool {
        !matches!(self, Self::LevelNotFound { .. })
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overlap {
                kind,
                position,
                other,
            } => write!(
                f,
                "Building {kind} at ({}, {}) overlaps {other}",
                position.x, position.y
            ),
            Self::NotInTownhall { kind } => write!(f, "Building {kind} not found in townhall"),
            Self::CountAboveMax { kind, count, max } => {
                write!(f, "Building {kind} count is more than allowed ({count} > {max})")
            }
            Self::LevelNotFound { kind } => write!(f, "Building {kind} level not found"),
            Self::LevelAboveMax { kind, level, max } => {
                write!(f, "Building {kind} level is more than allowed ({level} > {max})")
            }
            Self::CountBelowMin { kind, count, min } => {
                write!(f, "Building {kind} count is less than required ({count} < {min})")
            }
        }
    }
}

/// Outcome of [`validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    /// Overall verdict.
    pub valid: bool,
    /// Level of the townhall the rules were taken from; `None` when the
    /// village has no townhall.
    pub townhall_level: Option<u32>,
    /// Violations in detection order.
    pub warnings: Vec<Warning>,
}

impl ValidationResult {
    /// Result for a village without a townhall.
    #[must_use]
    pub fn missing_townhall() -> Self {
        Self {
            valid: false,
            townhall_level: None,
            warnings: Vec::new(),
        }
    }

    /// Whether the village passed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Warnings rendered as text, in detection order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }
}

/// Validate resolved structures against the townhall rules.
///
/// Warnings come in detection order: overlaps in structure order, then
/// ceilings per kind in first-seen order, then floors in table order
/// (resource, army, defense, trap).
///
/// `catalog` must already hold the townhall entry for the floor check to
/// run; it is only read.
#[must_use]
pub fn validate(structures: &[Structure], catalog: &Catalog) -> ValidationResult {
    let mut warnings = Vec::new();
    let mut townhall: Option<&Structure> = None;
    let mut current = KindLevels::default();
    let mut occupied: HashMap<GridPos, usize> = HashMap::new();

    for (index, structure) in structures.iter().enumerate() {
        if structure.kind == TOWNHALL && townhall.is_none() {
            townhall = Some(structure);
        }
        current.push(&structure.kind, structure.level);

        match occupied.entry(structure.position) {
            Entry::Occupied(slot) => warnings.push(Warning::Overlap {
                kind: structure.kind.clone(),
                position: structure.position,
                other: structures[*slot.get()].kind.clone(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(index);
            }
        }
    }

    let Some(townhall) = townhall else {
        tracing::warn!("no townhall found, unable to validate village");
        return ValidationResult::missing_townhall();
    };

    let max_counts = townhall.record.max_counts();
    let max_levels = townhall.record.max_levels();

    for (kind, levels) in current.iter() {
        let count = count_of(levels);

        let Some(max_count) = max_counts.get(kind) else {
            if kind != TOWNHALL {
                warnings.push(Warning::NotInTownhall {
                    kind: kind.to_string(),
                });
            } else if count > 1 {
                warnings.push(Warning::CountAboveMax {
                    kind: kind.to_string(),
                    count,
                    max: 1,
                });
            }
            continue;
        };

        if count > max_count {
            warnings.push(Warning::CountAboveMax {
                kind: kind.to_string(),
                count,
                max: max_count,
            });
        }

        let Some(max_level) = max_levels.get(kind) else {
            warnings.push(Warning::LevelNotFound {
                kind: kind.to_string(),
            });
            continue;
        };

        let highest = levels.iter().copied().max().unwrap_or(0);
        if highest > max_level {
            warnings.push(Warning::LevelAboveMax {
                kind: kind.to_string(),
                level: highest,
                max: max_level,
            });
        }
    }

    let previous = townhall
        .level
        .checked_sub(1)
        .filter(|level| *level >= 1)
        .and_then(|level| catalog.townhall_level(level));

    if let Some(previous) = previous {
        let min_counts = CapacityMap::merge_sum(previous.count_tables());
        let mut seen = HashSet::new();
        let table_order = previous
            .count_tables()
            .flat_map(|table| table.iter().map(|(kind, _)| kind))
            .filter(|kind| seen.insert(*kind));
        for kind in table_order {
            let min = min_counts.get(kind).unwrap_or(0);
            let count = current.get(kind).map_or(0, count_of);
            if count < min {
                warnings.push(Warning::CountBelowMin {
                    kind: kind.to_string(),
                    count,
                    min,
                });
            }
        }
    } else {
        tracing::debug!(level = townhall.level, "no previous townhall data, skipping floor check");
    }

    ValidationResult {
        valid: !warnings.iter().any(Warning::invalidates),
        townhall_level: Some(townhall.level),
        warnings,
    }
}

fn count_of(levels: &[u32]) -> u32 {
    u32::try_from(levels.len()).unwrap_or(u32::MAX)
}

/// Levels of every instance, grouped by kind in first-seen order.
#[derive(Debug, Default)]
struct KindLevels<'a> {
    index: HashMap<&'a str, usize>,
    groups: Vec<(&'a str, Vec<u32>)>,
}

impl<'a> KindLevels<'a> {
    fn push(&mut self, kind: &'a str, level: u32) {
        match self.index.entry(kind) {
            Entry::Occupied(slot) => self.groups[*slot.get()].1.push(level),
            Entry::Vacant(slot) => {
                slot.insert(self.groups.len());
                self.groups.push((kind, vec![level]));
            }
        }
    }

    fn get(&self, kind: &str) -> Option<&[u32]> {
        self.index.get(kind).map(|&i| self.groups[i].1.as_slice())
    }

    fn iter(&self) -> impl Iterator<Item = (&'a str, &[u32])> + '_ {
        self.groups.iter().map(|(kind, levels)| (*kind, levels.as_slice()))
    }
}
