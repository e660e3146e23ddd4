//! Batch command implementation.

// Progress counts and rates are display-only
#![allow(clippy::cast_precision_loss)]

use super::output::{format_batch_csv, format_batch_text, JsonBatchResult};
use super::{BatchFormat, CliError, WorldArgs};
use bastion::audit::audit_files_with;
use bastion::Catalog;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;

/// Execute the batch command.
///
/// Per-file failures are reported in the output, not returned.
///
/// # Errors
///
/// Returns an error if the world config cannot be loaded or the output
/// cannot be serialized.
pub(crate) fn execute(
    villages: &[PathBuf],
    world: &WorldArgs,
    threads: Option<usize>,
    format: BatchFormat,
    progress: bool,
) -> Result<(), CliError> {
    let config = world.load_config()?;

    // Set thread pool size if specified
    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    // Progress bar
    let pb = if progress {
        let pb = ProgressBar::new(villages.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} villages ({per_sec})")
            .map_err(|e| CliError::new(format!("Invalid progress template: {e}")))?
            .progress_chars("=>-");
        pb.set_style(style);
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();
    let catalog_dir = &world.catalog_dir;

    let audits = audit_files_with(
        villages,
        || Catalog::from_dir(catalog_dir),
        config.cell_size,
        |_| {
            if let Some(pb) = &pb {
                pb.inc(1);
            }
        },
    );

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();
    let per_sec = if duration.as_secs_f64() > 0.0 {
        audits.len() as f64 / duration.as_secs_f64()
    } else {
        0.0
    };

    match format {
        BatchFormat::Text => {
            println!();
            print!("{}", format_batch_text(&audits));
            println!();
            println!("Duration: {:.2}s ({per_sec:.0} villages/sec)", duration.as_secs_f64());
        }
        BatchFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonBatchResult::from_audits(&audits))
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
        BatchFormat::Csv => {
            print!("{}", format_batch_csv(&audits));
        }
    }

    Ok(())
}
