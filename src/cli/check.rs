//! Check command implementation.

use super::output::{format_text, JsonVillageReport};
use super::{village_name, CliError, OutputFormat, WorldArgs};
use bastion::render::render_ascii;
use bastion::{audit_village, Catalog, Village};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Execute the check command.
///
/// # Errors
///
/// Returns an error if the config, the snapshot or a catalog entry cannot be
/// loaded.
pub(crate) fn execute(
    input_village: Option<PathBuf>,
    world: &WorldArgs,
    format: OutputFormat,
    render: bool,
) -> Result<(), CliError> {
    let config = world.load_config()?;

    let Some(path) = input_village else {
        println!("No village given, nothing to validate.");
        println!();
        println!("World:");
        println!("  Grid:       {}x{} cells", config.num_cols, config.num_rows);
        println!("  Cell size:  {}px", config.cell_size);
        println!("  Catalog:    {}", world.catalog_dir.display());
        return Ok(());
    };

    let village = Village::load(&path)?;
    let mut catalog = Catalog::from_dir(&world.catalog_dir);
    let audit = audit_village(&village, &mut catalog, config.cell_size)?;

    match format {
        OutputFormat::Text => {
            print!("{}", format_text(&audit.result));
            if render {
                println!();
                let color = std::io::stdout().is_terminal();
                print!("{}", render_ascii(&audit.structures, &config, color));
            }
        }
        OutputFormat::Json => {
            let report = JsonVillageReport::from_audit(village_name(&path), &audit);
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
    }

    Ok(())
}
