#![no_main]

use arbitrary::Arbitrary;
use bastion::catalog::{CatalogEntry, Category, Footprint, LevelRecord, MemorySource};
use bastion::render::render_ascii;
use bastion::{audit_village, Catalog, RawBuilding, Village, WorldConfig, TOWNHALL};
use libfuzzer_sys::fuzz_target;

/// Structured input for layout fuzzing.
#[derive(Arbitrary, Debug)]
struct LayoutInput {
    /// Townhall position, if any.
    townhall: Option<(i32, i32)>,
    /// Footprint of the block kind (capped to keep grids small).
    block_size: (u8, u8),
    /// Block positions.
    blocks: Vec<(i32, i32)>,
    /// Cell size in pixels.
    cell_size: u32,
}

fuzz_target!(|input: LayoutInput| {
    let width = u32::from(input.block_size.0 % 8) + 1;
    let height = u32::from(input.block_size.1 % 8) + 1;
    let cell_size = input.cell_size.min(1 << 16);

    let mut catalog = Catalog::new(
        MemorySource::new()
            .with_entry(
                TOWNHALL,
                CatalogEntry::new(Footprint::new(4, 4), Category::Other)
                    .with_max_count(1)
                    .with_level(1, LevelRecord::default()),
            )
            .with_entry(
                "block",
                CatalogEntry::new(Footprint::new(width, height), Category::Other)
                    .with_level(1, LevelRecord::default()),
            ),
    );

    let mut buildings = Vec::new();
    if let Some((x, y)) = input.townhall {
        buildings.push(RawBuilding::at(TOWNHALL, 1, x, y));
    }
    let positions = input.blocks.iter().take(256).map(|&(x, y)| [x, y]).collect();
    buildings.push(RawBuilding::at_positions("block", 1, positions));

    let village = Village { buildings };
    let Ok(audit) = audit_village(&village, &mut catalog, cell_size) else {
        return;
    };

    let config = WorldConfig {
        num_cols: 16,
        num_rows: 16,
        ..WorldConfig::default()
    };
    let _ = render_ascii(&audit.structures, &config, false);
});
