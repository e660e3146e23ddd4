//! Output formatting utilities for CLI.

use bastion::audit::FileAudit;
use bastion::structure::Structure;
use bastion::{Audit, ValidationResult};
use serde::Serialize;
use std::fmt::Write;

use super::village_name;

/// Line printed when a village has no townhall.
pub(super) const NO_TOWNHALL: &str = "No townhall found, unable to validate village!";

/// Verdict line for a validation result.
pub(super) fn verdict(result: &ValidationResult) -> &'static str {
    if result.is_valid() {
        "Valid village"
    } else {
        "Invalid village"
    }
}

/// Format a validation result as human-readable text.
pub(super) fn format_text(result: &ValidationResult) -> String {
    let mut output = String::new();

    if result.townhall_level.is_none() {
        let _ = writeln!(output, "{NO_TOWNHALL}");
    }
    for message in result.messages() {
        let _ = writeln!(output, "[!] {message}");
    }
    let _ = writeln!(output, "{}", verdict(result));

    output
}

/// JSON-serializable single village report.
#[derive(Debug, Serialize)]
pub(super) struct JsonVillageReport<'a> {
    /// Snapshot name.
    village: String,
    /// Overall verdict.
    valid: bool,
    /// Townhall level the rules came from.
    townhall_level: Option<u32>,
    /// Structured warnings.
    warnings: &'a [bastion::Warning],
    /// Warnings rendered as text.
    messages: Vec<String>,
    /// Resolved structures.
    structures: &'a [Structure],
}

impl<'a> JsonVillageReport<'a> {
    /// Create from an audit.
    pub(super) fn from_audit(village: String, audit: &'a Audit) -> Self {
        Self {
            village,
            valid: audit.result.valid,
            townhall_level: audit.result.townhall_level,
            warnings: &audit.result.warnings,
            messages: audit.result.messages(),
            structures: &audit.structures,
        }
    }
}

/// Batch summary counts.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub(super) struct BatchStats {
    /// Files processed.
    pub(super) villages: usize,
    /// Files found valid.
    pub(super) valid: usize,
    /// Files found invalid.
    pub(super) invalid: usize,
    /// Files that could not be audited.
    pub(super) errors: usize,
    /// Total warnings across audited files.
    pub(super) warnings: usize,
}

impl BatchStats {
    /// Tally a batch.
    pub(super) fn from_audits(audits: &[FileAudit]) -> Self {
        audits.iter().fold(Self::default(), |mut stats, file| {
            stats.villages += 1;
            match &file.outcome {
                Ok(audit) if audit.result.is_valid() => stats.valid += 1,
                Ok(_) => stats.invalid += 1,
                Err(_) => stats.errors += 1,
            }
            if let Ok(audit) = &file.outcome {
                stats.warnings += audit.result.warnings.len();
            }
            stats
        })
    }

    /// Share of audited files that passed (0.0-1.0).
    #[allow(clippy::cast_precision_loss)]
    pub(super) fn valid_rate(&self) -> f64 {
        let audited = self.valid + self.invalid;
        if audited == 0 {
            return 0.0;
        }
        self.valid as f64 / audited as f64
    }
}

/// JSON-serializable batch result.
#[derive(Debug, Serialize)]
pub(super) struct JsonBatchResult {
    /// Summary counts.
    summary: BatchStats,
    /// Per-file results, in input order.
    villages: Vec<JsonBatchEntry>,
}

/// JSON-serializable per-file batch entry.
#[derive(Debug, Serialize)]
struct JsonBatchEntry {
    /// Snapshot name.
    village: String,
    /// Verdict, null when the file failed.
    valid: Option<bool>,
    /// Townhall level, null when absent or failed.
    townhall_level: Option<u32>,
    /// Warnings rendered as text.
    messages: Vec<String>,
    /// Fatal error, if any.
    error: Option<String>,
}

impl JsonBatchResult {
    /// Create from batch audits.
    pub(super) fn from_audits(audits: &[FileAudit]) -> Self {
        let villages = audits
            .iter()
            .map(|file| {
                let village = village_name(&file.path);
                match &file.outcome {
                    Ok(audit) => JsonBatchEntry {
                        village,
                        valid: Some(audit.result.valid),
                        townhall_level: audit.result.townhall_level,
                        messages: audit.result.messages(),
                        error: None,
                    },
                    Err(e) => JsonBatchEntry {
                        village,
                        valid: None,
                        townhall_level: None,
                        messages: Vec::new(),
                        error: Some(e.to_string()),
                    },
                }
            })
            .collect();

        Self {
            summary: BatchStats::from_audits(audits),
            villages,
        }
    }
}

/// Format batch results as human-readable text.
pub(super) fn format_batch_text(audits: &[FileAudit]) -> String {
    let stats = BatchStats::from_audits(audits);
    let mut output = String::new();

    let _ = writeln!(output, "Batch Results ({} villages)", stats.villages);
    output.push_str("========================================\n\n");

    for file in audits {
        let name = village_name(&file.path);
        match &file.outcome {
            Ok(audit) => {
                let level = audit
                    .result
                    .townhall_level
                    .map_or_else(|| "no townhall".to_string(), |l| format!("TH{l}"));
                let _ = writeln!(output, "  {name}: {} ({level})", verdict(&audit.result));
                for message in audit.result.messages() {
                    let _ = writeln!(output, "    [!] {message}");
                }
            }
            Err(e) => {
                let _ = writeln!(output, "  {name}: error: {e}");
            }
        }
    }

    let _ = writeln!(
        output,
        "\nValid: {} / Invalid: {} / Errors: {} ({:.1}% valid)",
        stats.valid,
        stats.invalid,
        stats.errors,
        stats.valid_rate() * 100.0
    );

    output
}

/// Format batch results as CSV.
pub(super) fn format_batch_csv(audits: &[FileAudit]) -> String {
    let mut output = String::new();

    // Header
    output.push_str("village,valid,townhall_level,warnings,error\n");

    for file in audits {
        let name = csv_field(&village_name(&file.path));
        match &file.outcome {
            Ok(audit) => {
                let level = audit
                    .result
                    .townhall_level
                    .map_or_else(String::new, |l| l.to_string());
                let _ = writeln!(
                    output,
                    "{name},{},{level},{},",
                    audit.result.valid,
                    audit.result.warnings.len()
                );
            }
            Err(e) => {
                let _ = writeln!(output, "{name},,,,{}", csv_field(&e.to_string()));
            }
        }
    }

    output
}

/// Quote a CSV field when it needs it.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
