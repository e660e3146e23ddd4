//! Catalog entry types: footprint, category, capacity tables and level records.

use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Largest footprint side, in cells, a catalog document may declare.
pub const MAX_FOOTPRINT_SIDE: u32 = 256;

/// Footprint of a building in grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Footprint {
    /// Width in cells (x axis).
    pub width: u32,
    /// Height in cells (y axis).
    pub height: u32,
}

impl Footprint {
    /// Create a new footprint.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Category tag of a building kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Resource producers and storages.
    Resource,
    /// Army buildings.
    Army,
    /// Defensive buildings.
    Defense,
    /// Traps.
    Trap,
    /// Anything else, including the townhall and unknown tags.
    #[default]
    #[serde(other)]
    Other,
}

/// A capacity table: building kind → allowed maximum.
///
/// Keys are kind names; iteration is in key order so that every check built
/// on top of a table is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapacityMap(BTreeMap<String, u32>);

impl CapacityMap {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit for `kind`, if the table mentions it.
    #[must_use]
    pub fn get(&self, kind: &str) -> Option<u32> {
        self.0.get(kind).copied()
    }

    /// Whether the table mentions `kind`.
    #[must_use]
    pub fn contains(&self, kind: &str) -> bool {
        self.0.contains_key(kind)
    }

    /// Set the limit for `kind`, replacing any previous value.
    pub fn insert(&mut self, kind: impl Into<String>, value: u32) {
        self.0.insert(kind.into(), value);
    }

    /// Add `value` to the limit for `kind`, inserting zero first when the
    /// kind is new.
    pub fn add(&mut self, kind: &str, value: u32) {
        let slot = self.0.entry(kind.to_string()).or_insert(0);
        *slot = slot.saturating_add(value);
    }

    /// Merge several tables into one by summing per kind.
    ///
    /// A kind that appears in more than one table gets the sum of its
    /// limits, never the last value seen.
    #[must_use]
    pub fn merge_sum<'a>(tables: impl IntoIterator<Item = &'a CapacityMap>) -> Self {
        let mut merged = Self::new();
        for table in tables {
            for (kind, value) in table.iter() {
                merged.add(kind, value);
            }
        }
        merged
    }

    /// Iterate `(kind, limit)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of kinds in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, u32)> for CapacityMap {
    fn from_iter<T: IntoIterator<Item = (K, u32)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Per-level record of a catalog entry.
///
/// Only townhall levels carry capacity tables. Every other per-level field is
/// kept verbatim in [`LevelRecord::fields`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelRecord {
    /// Max number of each resource building.
    #[serde(rename = "max number of resource", default, skip_serializing_if = "Option::is_none")]
    pub max_resource_count: Option<CapacityMap>,
    /// Max level of each resource building.
    #[serde(rename = "max level of resource", default, skip_serializing_if = "Option::is_none")]
    pub max_resource_level: Option<CapacityMap>,
    /// Max number of each army building.
    #[serde(rename = "max number of army", default, skip_serializing_if = "Option::is_none")]
    pub max_army_count: Option<CapacityMap>,
    /// Max level of each army building.
    #[serde(rename = "max level of army", default, skip_serializing_if = "Option::is_none")]
    pub max_army_level: Option<CapacityMap>,
    /// Max number of each defense building.
    #[serde(rename = "max number of defense", default, skip_serializing_if = "Option::is_none")]
    pub max_defense_count: Option<CapacityMap>,
    /// Max level of each defense building.
    #[serde(rename = "max level of defense", default, skip_serializing_if = "Option::is_none")]
    pub max_defense_level: Option<CapacityMap>,
    /// Max number of each trap.
    #[serde(rename = "max number of traps", default, skip_serializing_if = "Option::is_none")]
    pub max_trap_count: Option<CapacityMap>,
    /// Max level of each trap.
    #[serde(rename = "max level of traps", default, skip_serializing_if = "Option::is_none")]
    pub max_trap_level: Option<CapacityMap>,
    /// All other per-level fields (hitpoints, costs, ...).
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl LevelRecord {
    /// The four max-count tables that are present (resource, army, defense, trap).
    pub fn count_tables(&self) -> impl Iterator<Item = &CapacityMap> + '_ {
        [
            self.max_resource_count.as_ref(),
            self.max_army_count.as_ref(),
            self.max_defense_count.as_ref(),
            self.max_trap_count.as_ref(),
        ]
        .into_iter()
        .flatten()
    }

    /// The four max-level tables that are present (resource, army, defense, trap).
    pub fn level_tables(&self) -> impl Iterator<Item = &CapacityMap> + '_ {
        [
            self.max_resource_level.as_ref(),
            self.max_army_level.as_ref(),
            self.max_defense_level.as_ref(),
            self.max_trap_level.as_ref(),
        ]
        .into_iter()
        .flatten()
    }

    /// Combined max counts across the four count tables.
    #[must_use]
    pub fn max_counts(&self) -> CapacityMap {
        CapacityMap::merge_sum(self.count_tables())
    }

    /// Combined max levels across the four level tables.
    #[must_use]
    pub fn max_levels(&self) -> CapacityMap {
        CapacityMap::merge_sum(self.level_tables())
    }
}

/// Catalog data for one building kind.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawEntry")]
pub struct CatalogEntry {
    /// Footprint in grid cells.
    pub size: Footprint,
    /// Construction limit declared by the catalog; `1` marks a single-instance kind.
    pub max_count: Option<u32>,
    /// Category tag.
    pub category: Category,
    /// Visual inset used by renderers.
    pub inset: f64,
    /// Name of the raw-building field this kind carries through resolution.
    pub payload: Option<String>,
    levels: BTreeMap<u32, LevelRecord>,
}

impl CatalogEntry {
    /// Create an entry with no levels.
    #[must_use]
    pub fn new(size: Footprint, category: Category) -> Self {
        Self {
            size,
            max_count: None,
            category,
            inset: 0.0,
            payload: None,
            levels: BTreeMap::new(),
        }
    }

    /// Set the declared max count.
    #[must_use]
    pub fn with_max_count(mut self, max_count: u32) -> Self {
        self.max_count = Some(max_count);
        self
    }

    /// Set the visual inset.
    #[must_use]
    pub fn with_inset(mut self, inset: f64) -> Self {
        self.inset = inset;
        self
    }

    /// Declare the payload field copied from raw buildings.
    #[must_use]
    pub fn with_payload(mut self, field: impl Into<String>) -> Self {
        self.payload = Some(field.into());
        self
    }

    /// Add or replace the record for `level`.
    #[must_use]
    pub fn with_level(mut self, level: u32, record: LevelRecord) -> Self {
        self.levels.insert(level, record);
        self
    }

    /// Record for `level`, if the catalog has one.
    #[must_use]
    pub fn level(&self, level: u32) -> Option<&LevelRecord> {
        self.levels.get(&level)
    }

    /// All levels in ascending order.
    pub fn levels(&self) -> impl Iterator<Item = (u32, &LevelRecord)> + '_ {
        self.levels.iter().map(|(l, r)| (*l, r))
    }

    /// Number of level records.
    #[must_use]
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Whether only one instance of this kind may be placed.
    #[must_use]
    pub fn is_single_instance(&self) -> bool {
        self.max_count == Some(1)
    }
}

/// Wire shape of a catalog document before level keys are split out.
#[derive(Deserialize)]
struct RawEntry {
    size: Footprint,
    #[serde(rename = "max count", default)]
    max_count: Option<u32>,
    #[serde(rename = "type", default)]
    category: Category,
    #[serde(default)]
    inset: f64,
    #[serde(default)]
    payload: Option<String>,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

impl TryFrom<RawEntry> for CatalogEntry {
    type Error = CatalogError;

    fn try_from(raw: RawEntry) -> Result<Self, Self::Error> {
        let Footprint { width, height } = raw.size;
        if width > MAX_FOOTPRINT_SIDE || height > MAX_FOOTPRINT_SIDE {
            return Err(CatalogError::InvalidFootprint {
                width,
                height,
                max: MAX_FOOTPRINT_SIDE,
            });
        }

        let mut levels = BTreeMap::new();
        for (key, value) in raw.rest {
            let Ok(level) = key.parse::<u32>() else {
                tracing::trace!(key = %key, "ignoring non-level catalog key");
                continue;
            };
            let record: LevelRecord =
                serde_json::from_value(value).map_err(|e| CatalogError::InvalidLevel {
                    level: key.clone(),
                    reason: e.to_string(),
                })?;
            levels.insert(level, record);
        }

        Ok(Self {
            size: raw.size,
            max_count: raw.max_count,
            category: raw.category,
            inset: raw.inset,
            payload: raw.payload,
            levels,
        })
    }
}
