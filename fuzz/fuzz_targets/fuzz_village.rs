#![no_main]

use bastion::catalog::{CatalogEntry, Category, Footprint, LevelRecord, MemorySource};
use bastion::{audit_village, Catalog, Village, TOWNHALL};
use libfuzzer_sys::fuzz_target;

fn catalog() -> Catalog {
    let th = LevelRecord {
        max_defense_count: Some([("cannon", 2)].into_iter().collect()),
        max_defense_level: Some([("cannon", 2)].into_iter().collect()),
        ..LevelRecord::default()
    };
    Catalog::new(
        MemorySource::new()
            .with_entry(
                TOWNHALL,
                CatalogEntry::new(Footprint::new(4, 4), Category::Other)
                    .with_max_count(1)
                    .with_level(1, th.clone())
                    .with_level(2, th),
            )
            .with_entry(
                "cannon",
                CatalogEntry::new(Footprint::new(3, 3), Category::Defense)
                    .with_level(1, LevelRecord::default())
                    .with_level(2, LevelRecord::default()),
            ),
    )
}

// Arbitrary snapshot text: parsing, resolution and validation must never panic.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(village) = Village::from_json(text) else {
        return;
    };

    let mut catalog = catalog();
    if let Ok(audit) = audit_village(&village, &mut catalog, 10) {
        assert_eq!(
            audit.result.valid,
            !audit.result.warnings.iter().any(|w| w.invalidates())
        );
        if audit.result.townhall_level.is_none() {
            assert!(audit.result.warnings.is_empty());
        }
    }
});
