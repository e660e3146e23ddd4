//! Structure resolution: raw building placements → positioned structures.

use crate::catalog::{Catalog, CatalogEntry, Category, Footprint, LevelRecord};
use crate::error::ResolveError;
use crate::village::RawBuilding;
use serde::Serialize;
use serde_json::{Map, Value};

/// A grid cell coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct GridPos {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl GridPos {
    /// Create a new grid position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A point in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Pixel {
    /// Horizontal pixel offset.
    pub x: i64,
    /// Vertical pixel offset.
    pub y: i64,
}

/// A resolved, positioned building instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Structure {
    /// Building kind name.
    pub kind: String,
    /// Category tag from the catalog.
    pub category: Category,
    /// Building level.
    pub level: u32,
    /// Top-left grid cell.
    pub position: GridPos,
    /// Footprint in cells.
    pub size: Footprint,
    /// Label anchor in pixels.
    pub center: Pixel,
    /// Visual inset.
    pub inset: f64,
    /// Own copy of the catalog record for this level.
    pub record: LevelRecord,
    /// Payload fields copied from the raw building.
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub extras: Map<String, Value>,
}

impl Structure {
    /// Every grid cell covered by the footprint, row by row.
    ///
    /// Cells past the edge of the `i32` grid are skipped.
    pub fn cells(&self) -> impl Iterator<Item = GridPos> + '_ {
        let (x0, y0) = (i64::from(self.position.x), i64::from(self.position.y));
        let (w, h) = (i64::from(self.size.width), i64::from(self.size.height));
        (y0..y0 + h).flat_map(move |y| {
            (x0..x0 + w).filter_map(move |x| {
                Some(GridPos::new(i32::try_from(x).ok()?, i32::try_from(y).ok()?))
            })
        })
    }

    /// Whether the footprint covers `cell`.
    #[must_use]
    pub fn covers(&self, cell: GridPos) -> bool {
        let dx = i64::from(cell.x) - i64::from(self.position.x);
        let dy = i64::from(cell.y) - i64::from(self.position.y);
        (0..i64::from(self.size.width)).contains(&dx) && (0..i64::from(self.size.height)).contains(&dy)
    }
}


/// Label anchor of a footprint placed at `position`.
///
/// Each axis is `(p + size / 2) * cell_size`; an odd dimension adds half a
/// cell on that axis so the anchor sits in the middle cell.
#[must_use]
pub fn center_of(position: GridPos, size: Footprint, cell_size: u32) -> Pixel {
    let cell = i64::from(cell_size);
    let axis = |p: i32, extent: u32| {
        let base = (i64::from(p) + i64::from(extent / 2)) * cell;
        if extent % 2 == 1 { base + cell / 2 } else { base }
    };
    Pixel {
        x: axis(position.x, size.width),
        y: axis(position.y, size.height),
    }
}

/// Expand raw buildings into structures, loading catalog entries on demand.
///
/// A building of a single-instance kind is placed at its `x`/`y`; any other
/// building is placed at each of its `positions` (or at `x`/`y` when it has
/// no list). Every structure receives its own copy of the level record.
///
/// # Errors
///
/// Fails on the first building whose kind, level or position cannot be
/// resolved; no partial list is returned.
pub fn resolve(
    buildings: &[RawBuilding],
    catalog: &mut Catalog,
    cell_size: u32,
) -> Result<Vec<Structure>, ResolveError> {
    let mut structures = Vec::with_capacity(buildings.len());

    for building in buildings {
        let entry = catalog
            .entry(&building.kind)
            .map_err(|source| ResolveError::Catalog {
                kind: building.kind.clone(),
                source,
            })?;
        let record = entry
            .level(building.level)
            .ok_or_else(|| ResolveError::UnknownLevel {
                kind: building.kind.clone(),
                level: building.level,
            })?;
        let extras = payload_of(&entry, building);

        for [x, y] in positions_of(&entry, building)? {
            let position = GridPos::new(x, y);
            structures.push(Structure {
                kind: building.kind.clone(),
                category: entry.category,
                level: building.level,
                position,
                size: entry.size,
                center: center_of(position, entry.size, cell_size),
                inset: entry.inset,
                record: record.clone(),
                extras: extras.clone(),
            });
        }
    }

    tracing::debug!(
        buildings = buildings.len(),
        structures = structures.len(),
        "resolved village structures"
    );
    Ok(structures)
}

fn positions_of(entry: &CatalogEntry, building: &RawBuilding) -> Result<Vec<[i32; 2]>, ResolveError> {
    let missing = |expected| ResolveError::MissingPosition {
        kind: building.kind.clone(),
        expected,
    };

    if entry.is_single_instance() {
        return building.singleton().map(|p| vec![p]).ok_or_else(|| missing("x and y"));
    }

    match (&building.positions, building.singleton()) {
        (Some(list), _) => Ok(list.clone()),
        (None, Some(p)) => Ok(vec![p]),
        (None, None) => Err(missing("positions or x and y")),
    }
}

fn payload_of(entry: &CatalogEntry, building: &RawBuilding) -> Map<String, Value> {
    let mut extras = Map::new();
    if let Some(field) = &entry.payload
        && let Some(value) = building.extras.get(field)
    {
        extras.insert(field.clone(), value.clone());
    }
    extras
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MemorySource;
    use crate::error::CatalogError;
    use serde_json::json;

    fn test_catalog() -> Catalog {
        let level = |hp: u32| {
            let mut record = LevelRecord::default();
            record.fields.insert("hitpoints".to_string(), json!(hp));
            record
        };
        let source = MemorySource::new()
            .with_entry(
                "townhall",
                CatalogEntry::new(Footprint::new(4, 4), Category::Other)
                    .with_max_count(1)
                    .with_level(1, level(1000)),
            )
            .with_entry(
                "cannon",
                CatalogEntry::new(Footprint::new(3, 3), Category::Defense)
                    .with_max_count(2)
                    .with_inset(0.5)
                    .with_level(1, level(400))
                    .with_level(2, level(450)),
            )
            .with_entry(
                "army camp",
                CatalogEntry::new(Footprint::new(5, 4), Category::Army)
                    .with_max_count(4)
                    .with_payload("troops")
                    .with_level(1, level(250)),
            );
        Catalog::new(source)
    }

    #[test]
    fn test_center_even_footprint() {
        let center = center_of(GridPos::new(10, 6), Footprint::new(4, 2), 10);
        assert_eq!(center, Pixel { x: 120, y: 70 });
    }

    #[test]
    fn test_center_odd_width_only_shifts_x() {
        let center = center_of(GridPos::new(10, 6), Footprint::new(3, 2), 10);
        assert_eq!(center, Pixel { x: 115, y: 70 });
    }

    #[test]
    fn test_center_odd_both_axes() {
        let center = center_of(GridPos::new(0, 0), Footprint::new(3, 3), 20);
        assert_eq!(center, Pixel { x: 30, y: 30 });
    }

    #[test]
    fn test_single_instance_uses_singleton() {
        let mut catalog = test_catalog();
        let buildings = vec![RawBuilding::at("townhall", 1, 20, 20)];

        let structures = resolve(&buildings, &mut catalog, 10).unwrap();
        assert_eq!(structures.len(), 1);
        assert_eq!(structures[0].position, GridPos::new(20, 20));
        assert_eq!(structures[0].size, Footprint::new(4, 4));
        assert_eq!(structures[0].center, Pixel { x: 220, y: 220 });
        assert_eq!(structures[0].category, Category::Other);
    }

    #[test]
    fn test_multi_instance_expands_each_position() {
        let mut catalog = test_catalog();
        let buildings = vec![RawBuilding::at_positions("cannon", 2, vec![[1, 1], [5, 5]])];

        let structures = resolve(&buildings, &mut catalog, 10).unwrap();
        assert_eq!(structures.len(), 2);
        for s in &structures {
            assert_eq!(s.kind, "cannon");
            assert_eq!(s.level, 2);
            assert_eq!(s.category, Category::Defense);
            assert_eq!(s.size, Footprint::new(3, 3));
            assert_eq!(s.record.fields.get("hitpoints"), Some(&json!(450)));
        }
        assert_eq!(structures[0].position, GridPos::new(1, 1));
        assert_eq!(structures[1].position, GridPos::new(5, 5));
        assert_ne!(structures[0].center, structures[1].center);
    }

    #[test]
    fn test_multi_instance_falls_back_to_singleton() {
        let mut catalog = test_catalog();
        let buildings = vec![RawBuilding::at("cannon", 1, 7, 8)];
        let structures = resolve(&buildings, &mut catalog, 10).unwrap();
        assert_eq!(structures.len(), 1);
        assert_eq!(structures[0].position, GridPos::new(7, 8));
    }

    #[test]
    fn test_records_are_independent_copies() {
        let mut catalog = test_catalog();
        let buildings = vec![RawBuilding::at_positions("cannon", 1, vec![[0, 0], [4, 0]])];

        let mut structures = resolve(&buildings, &mut catalog, 10).unwrap();
        structures[0]
            .record
            .fields
            .insert("hitpoints".to_string(), json!(1));

        assert_eq!(structures[1].record.fields.get("hitpoints"), Some(&json!(400)));
        let cached = catalog.get("cannon").unwrap().level(1).unwrap();
        assert_eq!(cached.fields.get("hitpoints"), Some(&json!(400)));
    }

    #[test]
    fn test_payload_copied_for_payload_kinds_only() {
        let mut catalog = test_catalog();
        let troops = json!({"barbarian": 20, "archer": 5});
        let buildings = vec![
            RawBuilding::at_positions("army camp", 1, vec![[30, 30]])
                .with_extra("troops", troops.clone())
                .with_extra("note", json!("not copied")),
            RawBuilding::at("cannon", 1, 0, 0).with_extra("troops", json!({})),
        ];

        let structures = resolve(&buildings, &mut catalog, 10).unwrap();
        assert_eq!(structures[0].extras.get("troops"), Some(&troops));
        assert!(!structures[0].extras.contains_key("note"));
        assert!(structures[1].extras.is_empty());
    }

    #[test]
    fn test_unknown_kind_fails_whole_pass() {
        let mut catalog = test_catalog();
        let buildings = vec![
            RawBuilding::at("townhall", 1, 0, 0),
            RawBuilding::at("mortar", 1, 10, 10),
        ];
        let err = resolve(&buildings, &mut catalog, 10).unwrap_err();
        assert!(matches!(
            err,
            ResolveError::Catalog { source: CatalogError::UnknownKind(_), .. }
        ));
    }

    #[test]
    fn test_unknown_level_fails() {
        let mut catalog = test_catalog();
        let buildings = vec![RawBuilding::at("cannon", 9, 0, 0)];
        let err = resolve(&buildings, &mut catalog, 10).unwrap_err();
        assert!(matches!(err, ResolveError::UnknownLevel { level: 9, .. }));
    }

    #[test]
    fn test_single_instance_without_singleton_fails() {
        let mut catalog = test_catalog();
        let buildings = vec![RawBuilding::at_positions("townhall", 1, vec![[0, 0]])];
        let err = resolve(&buildings, &mut catalog, 10).unwrap_err();
        assert!(matches!(err, ResolveError::MissingPosition { .. }));
    }

    #[test]
    fn test_multi_instance_without_any_position_fails() {
        let mut catalog = test_catalog();
        let mut building = RawBuilding::at("cannon", 1, 0, 0);
        building.x = None;
        let err = resolve(&[building], &mut catalog, 10).unwrap_err();
        assert!(matches!(err, ResolveError::MissingPosition { .. }));
    }

    #[test]
    fn test_cells_cover_footprint() {
        let mut catalog = test_catalog();
        let structures =
            resolve(&[RawBuilding::at("cannon", 1, 2, 3)], &mut catalog, 10).unwrap();
        let cells: Vec<GridPos> = structures[0].cells().collect();

        assert_eq!(cells.len(), 9);
        assert_eq!(cells[0], GridPos::new(2, 3));
        assert_eq!(cells[8], GridPos::new(4, 5));
        assert!(structures[0].covers(GridPos::new(4, 5)));
        assert!(!structures[0].covers(GridPos::new(5, 5)));
    }

    #[test]
    fn test_cells_past_grid_edge_are_skipped() {
        let mut catalog = test_catalog();
        let structures =
            resolve(&[RawBuilding::at("cannon", 1, i32::MAX - 1, 0)], &mut catalog, 10).unwrap();
        let cells: Vec<GridPos> = structures[0].cells().collect();

        assert_eq!(cells.len(), 6);
        assert_eq!(cells[0], GridPos::new(i32::MAX - 1, 0));
        assert_eq!(cells[1], GridPos::new(i32::MAX, 0));
        assert_eq!(cells[2], GridPos::new(i32::MAX - 1, 1));
    }
}
