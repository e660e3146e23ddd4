//! End-to-end tests over the shipped catalog and sample villages.
//!
//! Run with: cargo test village_integration

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::path::PathBuf;

use bastion::audit::{audit_file, audit_files};
use bastion::render::render_ascii;
use bastion::{Catalog, ValidationResult, Warning, WorldConfig};

fn data(path: &str) -> PathBuf {
    PathBuf::from(format!("{}/data/{path}", env!("CARGO_MANIFEST_DIR")))
}

fn catalog() -> Catalog {
    Catalog::from_dir(data("structures"))
}

fn village(name: &str) -> PathBuf {
    data(&format!("villages/{name}"))
}

#[test]
fn test_shipped_config_loads() {
    let config = WorldConfig::load(&data("config.json")).unwrap();
    assert_eq!(config.cell_size, 10);
    assert_eq!((config.num_cols, config.num_rows), (44, 44));
    assert_eq!(config.color_of("cannon"), Some([90, 90, 90]));
}

#[test]
fn test_valid_village_passes() {
    let mut catalog = catalog();
    let audit = audit_file(&village("valid_th2.json"), &mut catalog, 10).unwrap();

    assert!(audit.result.is_valid(), "warnings: {:?}", audit.result.messages());
    assert!(audit.result.warnings.is_empty());
    assert_eq!(audit.result.townhall_level, Some(2));
    // 1 townhall + 2 huts + 1 mine + 1 collector + 1 camp + 2 cannons + 1 tower + 2 bombs
    assert_eq!(audit.structures.len(), 11);

    let camp = audit.structures.iter().find(|s| s.kind == "army camp").unwrap();
    assert!(camp.extras.contains_key("troops"));
    let townhall = &audit.structures[0];
    assert_eq!((townhall.center.x, townhall.center.y), (220, 220));
}

#[test]
fn test_invalid_village_reports_every_rule() {
    let mut catalog = catalog();
    let audit = audit_file(&village("invalid_th2.json"), &mut catalog, 10).unwrap();
    let result = audit.result;

    assert!(!result.is_valid());
    assert_eq!(result.townhall_level, Some(2));
    assert_eq!(
        result.warnings,
        vec![
            Warning::Overlap {
                kind: "gold mine".to_string(),
                position: bastion::structure::GridPos::new(20, 20),
                other: "townhall".to_string(),
            },
            Warning::CountAboveMax {
                kind: "cannon".to_string(),
                count: 3,
                max: 2,
            },
            Warning::LevelAboveMax {
                kind: "archer tower".to_string(),
                level: 4,
                max: 2,
            },
            Warning::NotInTownhall {
                kind: "mortar".to_string(),
            },
            Warning::CountBelowMin {
                kind: "elixir collector".to_string(),
                count: 0,
                min: 1,
            },
        ]
    );
    assert!(result.messages().contains(&"Building mortar not found in townhall".to_string()));
}

#[test]
fn test_village_without_townhall() {
    let mut catalog = catalog();
    let audit = audit_file(&village("no_townhall.json"), &mut catalog, 10).unwrap();
    assert_eq!(audit.result, ValidationResult::missing_townhall());
    assert_eq!(audit.structures.len(), 3);
}

#[test]
fn test_first_level_townhall_skips_floor_check() {
    let mut catalog = catalog();
    let audit = audit_file(&village("starter_th1.json"), &mut catalog, 10).unwrap();
    assert!(audit.result.is_valid());
    assert_eq!(audit.result.townhall_level, Some(1));
}

#[test]
fn test_batch_keeps_input_order_and_isolates_failures() {
    let paths = vec![
        village("invalid_th2.json"),
        village("does_not_exist.json"),
        village("valid_th2.json"),
        village("no_townhall.json"),
    ];
    let audits = audit_files(&paths, &data("structures"), 10);

    assert_eq!(audits.len(), 4);
    for (audit, path) in audits.iter().zip(&paths) {
        assert_eq!(&audit.path, path);
    }
    assert!(!audits[0].is_valid());
    assert!(audits[1].outcome.is_err());
    assert!(audits[2].is_valid());
    assert!(!audits[3].is_valid());
}

#[test]
fn test_render_sample_village() {
    let config = WorldConfig::load(&data("config.json")).unwrap();
    let mut catalog = catalog();
    let audit = audit_file(&village("invalid_th2.json"), &mut catalog, config.cell_size).unwrap();
    let text = render_ascii(&audit.structures, &config, false);

    assert!(text.starts_with("Village 44x44 (cell 10px)\n"));
    assert!(text.contains('!'));
    assert!(text.contains("=townhall"));
    // header + top border + 44 rows + bottom border + blank + legend
    assert_eq!(text.lines().count(), 49);
}
