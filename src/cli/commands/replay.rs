//! Replay command implementation.
//!
//! Runs a timer script and prints the sessions it produced.

use std::io::Read;

use colored::Colorize;
use serde_json::json;
use tracing::info;

use super::open_store;
use crate::cli::args::{OutputFormat, ReplayArgs};
use crate::config::{Config, Paths};
use crate::core::Mode;
use crate::error::CcfError;
use crate::features::replay::{run_script, ReplayResult};
use crate::output::{format_record_pretty, format_snapshot_pretty, to_json};

/// Execute replay command
///
/// # Errors
///
/// Returns an error if the script cannot be read, parsed or run, or if
/// saving fails.
pub fn replay(
    args: &ReplayArgs,
    paths: &Paths,
    config: &Config,
    format: OutputFormat,
) -> Result<String, CcfError> {
    let source = read_source(args)?;
    let result = run_script(&source, args.lenient)?;

    let ids = if args.save && !result.records.is_empty() {
        let mut store = open_store(paths, config)?;
        let mut ids = Vec::with_capacity(result.records.len());
        for record in &result.records {
            ids.push(store.insert(record)?);
        }
        info!(count = ids.len(), "replayed sessions saved");
        ids
    } else {
        Vec::new()
    };

    render(&result, &ids, config.storage.target_ccf_percent, format)
}

fn read_source(args: &ReplayArgs) -> Result<String, CcfError> {
    if let Some(script) = &args.script {
        return Ok(script.replace(';', "\n"));
    }

    if let Some(path) = &args.file {
        return std::fs::read_to_string(path).map_err(|e| {
            CcfError::InvalidInput(format!("Failed to read script {}: {e}", path.display()))
        });
    }

    let mut source = String::new();
    std::io::stdin().read_to_string(&mut source)?;
    Ok(source)
}

fn render(
    result: &ReplayResult,
    ids: &[i64],
    target: u8,
    format: OutputFormat,
) -> Result<String, CcfError> {
    match format {
        OutputFormat::Json => {
            let sessions: Vec<_> = result
                .records
                .iter()
                .enumerate()
                .map(|(i, record)| json!({ "id": ids.get(i), "record": record }))
                .collect();
            to_json(&json!({
                "sessions": sessions,
                "snapshot": result.snapshot,
                "skipped_lines": result.skipped,
            }))
        }
        OutputFormat::Pretty => {
            let mut blocks: Vec<String> = result
                .records
                .iter()
                .enumerate()
                .map(|(i, record)| format_record_pretty(record, ids.get(i).copied(), target))
                .collect();

            if result.snapshot.mode != Mode::Ended {
                blocks.push(format_snapshot_pretty(&result.snapshot, target));
            }

            if !result.skipped.is_empty() {
                let lines: Vec<String> = result.skipped.iter().map(ToString::to_string).collect();
                blocks.push(format!(
                    "{} {}",
                    "Skipped lines:".yellow(),
                    lines.join(", ")
                ));
            }

            Ok(blocks.join("\n").trim_end().to_string())
        }
    }
}
