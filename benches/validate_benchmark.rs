//! Benchmarks for resolving and validating villages.
//!
//! Covers the per-village hot path used by batch audits.

#![allow(missing_docs)]

use std::hint::black_box;

use bastion::catalog::{CatalogEntry, Category, Footprint, LevelRecord, MemorySource};
use bastion::{resolve, validate, Catalog, RawBuilding, Village, TOWNHALL};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

fn catalog() -> Catalog {
    let th = LevelRecord {
        max_defense_count: Some([("cannon", 500), ("wall", 2000)].into_iter().collect()),
        max_defense_level: Some([("cannon", 5), ("wall", 5)].into_iter().collect()),
        ..LevelRecord::default()
    };
    let mut catalog = Catalog::new(
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
                    .with_level(1, LevelRecord::default()),
            )
            .with_entry(
                "wall",
                CatalogEntry::new(Footprint::new(1, 1), Category::Defense)
                    .with_level(1, LevelRecord::default()),
            ),
    );
    catalog
        .preload([TOWNHALL, "cannon", "wall"])
        .unwrap_or_else(|e| panic!("preload failed: {e}"));
    catalog
}

/// A townhall surrounded by a ring of walls and a grid of cannons.
fn village(side: i32) -> Village {
    let walls: Vec<[i32; 2]> = (0..side)
        .flat_map(|i| [[i, 0], [i, side - 1], [0, i], [side - 1, i]])
        .collect();
    let cannons: Vec<[i32; 2]> = (0..side / 4)
        .flat_map(|x| (0..side / 4).map(move |y| [2 + x * 4, 2 + y * 4]))
        .collect();
    Village {
        buildings: vec![
            RawBuilding::at(TOWNHALL, 2, side / 2, side / 2),
            RawBuilding::at_positions("wall", 1, walls),
            RawBuilding::at_positions("cannon", 1, cannons),
        ],
    }
}

fn bench_resolve(c: &mut Criterion) {
    let mut catalog = catalog();
    let village = village(44);

    c.bench_function("resolve_44", |b| {
        b.iter(|| {
            let structures = resolve(black_box(&village.buildings), &mut catalog, black_box(10));
            black_box(structures)
        });
    });
}

fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate");
    for side in [44, 88, 176] {
        let mut catalog = catalog();
        let structures = resolve(&village(side).buildings, &mut catalog, 10)
            .unwrap_or_else(|e| panic!("resolve failed: {e}"));

        group.bench_with_input(BenchmarkId::from_parameter(side), &structures, |b, s| {
            b.iter(|| black_box(validate(black_box(s), &catalog)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_resolve, bench_validate);
criterion_main!(benches);
