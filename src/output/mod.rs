//! Output formatting for ccf.
//!
//! Every command renders through here so `--output json` and the pretty
//! terminal view stay in step.

mod json;
mod pretty;

use crate::cli::args::OutputFormat;
use crate::core::{PauseReason, SessionRecord, TimerSnapshot};
use crate::error::CcfError;
use crate::features::sessions::{SessionReport, StoredSession};

pub use json::*;
pub use pretty::*;

/// Format saved sessions based on output format
///
/// # Errors
///
/// Returns `CcfError::Parse` if JSON serialization fails.
pub fn format_sessions(
    sessions: &[StoredSession],
    target: u8,
    format: OutputFormat,
) -> Result<String, CcfError> {
    match format {
        OutputFormat::Pretty => Ok(format_sessions_pretty(sessions, target)),
        OutputFormat::Json => format_sessions_json(sessions),
    }
}

/// Format a saved session based on output format
///
/// # Errors
///
/// Returns `CcfError::Parse` if JSON serialization fails.
pub fn format_session(
    session: &StoredSession,
    target: u8,
    format: OutputFormat,
) -> Result<String, CcfError> {
    match format {
        OutputFormat::Pretty => Ok(format_session_pretty(session, target)),
        OutputFormat::Json => to_json(session),
    }
}

/// Format a finished, possibly unsaved, record based on output format
///
/// # Errors
///
/// Returns `CcfError::Parse` if JSON serialization fails.
pub fn format_record(
    record: &SessionRecord,
    id: Option<i64>,
    target: u8,
    format: OutputFormat,
) -> Result<String, CcfError> {
    match format {
        OutputFormat::Pretty => Ok(format_record_pretty(record, id, target)),
        OutputFormat::Json => to_json(&serde_json::json!({ "id": id, "record": record })),
    }
}

/// Format a live snapshot based on output format
///
/// # Errors
///
/// Returns `CcfError::Parse` if JSON serialization fails.
pub fn format_snapshot(
    snapshot: &TimerSnapshot,
    target: u8,
    format: OutputFormat,
) -> Result<String, CcfError> {
    match format {
        OutputFormat::Pretty => Ok(format_snapshot_pretty(snapshot, target)),
        OutputFormat::Json => to_json(snapshot),
    }
}

/// Format a report based on output format
///
/// # Errors
///
/// Returns `CcfError::Parse` if JSON serialization fails.
pub fn format_report(report: &SessionReport, format: OutputFormat) -> Result<String, CcfError> {
    match format {
        OutputFormat::Pretty => Ok(report.format()),
        OutputFormat::Json => to_json(report),
    }
}

/// Format the reason vocabulary based on output format
///
/// # Errors
///
/// Returns `CcfError::Parse` if JSON serialization fails.
pub fn format_reasons(reasons: &[PauseReason], format: OutputFormat) -> Result<String, CcfError> {
    match format {
        OutputFormat::Pretty => Ok(format_reasons_pretty(reasons)),
        OutputFormat::Json => format_reasons_json(reasons),
    }
}
