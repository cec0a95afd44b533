//! JSON output formatting for ccf.

use serde::Serialize;
use serde_json::json;

use crate::core::PauseReason;
use crate::error::CcfError;
use crate::features::sessions::StoredSession;

/// Format saved sessions as JSON
///
/// # Errors
///
/// Returns `CcfError::Parse` if JSON serialization fails.
pub fn format_sessions_json(sessions: &[StoredSession]) -> Result<String, CcfError> {
    let output = json!({
        "count": sessions.len(),
        "items": sessions
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format the reason vocabulary as JSON
///
/// # Errors
///
/// Returns `CcfError::Parse` if JSON serialization fails.
pub fn format_reasons_json(reasons: &[PauseReason]) -> Result<String, CcfError> {
    let output = json!({
        "count": reasons.len(),
        "items": reasons
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Generic JSON formatter for any serializable type
///
/// # Errors
///
/// Returns `CcfError::Parse` if JSON serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, CcfError> {
    Ok(serde_json::to_string_pretty(value)?)
}
