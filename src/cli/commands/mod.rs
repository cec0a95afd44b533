//! Command implementations for ccf.
//!
//! Every command returns the text to print; `main` does the printing.

mod config;
mod replay;
mod report;
mod shell;

pub use config::config;
pub use replay::replay;
pub use report::report;
pub use shell::completions;

use tracing::info;

use crate::cli::args::OutputFormat;
use crate::config::{Config, Paths};
use crate::error::CcfError;
use crate::features::sessions::SessionStore;
use crate::output::{format_reasons, format_session, format_sessions, to_json};
use crate::storage::Database;

/// Open the session store under `paths`, creating it on first use.
///
/// # Errors
///
/// Returns an error if the data directory or database cannot be created.
pub fn open_store(paths: &Paths, config: &Config) -> Result<SessionStore, CcfError> {
    let db = Database::open(paths)?;
    Ok(SessionStore::with_database(db, config.storage.max_sessions))
}

/// Execute history command
///
/// # Errors
///
/// Returns an error if the sessions cannot be loaded or formatted.
pub fn history(
    store: &SessionStore,
    limit: usize,
    target: u8,
    format: OutputFormat,
) -> Result<String, CcfError> {
    let sessions = store.recent(limit)?;
    format_sessions(&sessions, target, format)
}

/// Execute show command
///
/// # Errors
///
/// Returns `CcfError::NotFound` if no session has this id.
pub fn show(
    store: &SessionStore,
    id: i64,
    target: u8,
    format: OutputFormat,
) -> Result<String, CcfError> {
    let session = store
        .get(id)?
        .ok_or_else(|| CcfError::NotFound(format!("Session {id}")))?;
    format_session(&session, target, format)
}

/// Execute delete command
///
/// # Errors
///
/// Returns `CcfError::NotFound` if no session has this id.
pub fn delete(store: &SessionStore, id: i64, format: OutputFormat) -> Result<String, CcfError> {
    if !store.delete(id)? {
        return Err(CcfError::NotFound(format!("Session {id}")));
    }
    info!(id, "session deleted");

    match format {
        OutputFormat::Json => to_json(&serde_json::json!({ "deleted": id })),
        OutputFormat::Pretty => Ok(format!("Deleted session #{id}")),
    }
}

/// Execute clear command
///
/// # Errors
///
/// Returns `CcfError::InvalidInput` without `--force`, or a database error.
pub fn clear(store: &SessionStore, force: bool, format: OutputFormat) -> Result<String, CcfError> {
    if !force {
        let count = store.count()?;
        return Err(CcfError::InvalidInput(format!(
            "This deletes all {count} sessions. Re-run with --force to confirm"
        )));
    }

    let removed = store.delete_all()?;
    info!(removed, "history cleared");

    match format {
        OutputFormat::Json => to_json(&serde_json::json!({ "deleted": removed })),
        OutputFormat::Pretty => Ok(format!("Deleted {removed} sessions")),
    }
}

/// Execute reasons command
///
/// # Errors
///
/// Returns an error if output formatting fails.
pub fn reasons(config: &Config, format: OutputFormat) -> Result<String, CcfError> {
    format_reasons(&config.reason_vocabulary(), format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SessionTimer;

    fn store_with_one() -> (SessionStore, i64) {
        let db = Database::open_in_memory().unwrap();
        let mut store = SessionStore::with_database(db, 0);
        let mut timer = SessionTimer::new();
        timer.start().unwrap();
        timer.tick(40_000);
        timer.pause(Vec::new()).unwrap();
        timer.tick(10_000);
        let id = store.insert(&timer.end().unwrap()).unwrap();
        (store, id)
    }

    #[test]
    fn test_show_missing_session() {
        let (store, _) = store_with_one();
        let err = show(&store, 999, 80, OutputFormat::Pretty).unwrap_err();
        assert!(matches!(err, CcfError::NotFound(_)));
    }

    #[test]
    fn test_show_json() {
        let (store, id) = store_with_one();
        let out = show(&store, id, 80, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["id"], id);
        assert_eq!(value["ccf_percent"], 80);
    }

    #[test]
    fn test_delete() {
        let (store, id) = store_with_one();
        assert_eq!(
            delete(&store, id, OutputFormat::Pretty).unwrap(),
            format!("Deleted session #{id}")
        );
        assert!(matches!(
            delete(&store, id, OutputFormat::Pretty),
            Err(CcfError::NotFound(_))
        ));
    }

    #[test]
    fn test_clear_requires_force() {
        let (store, _) = store_with_one();
        assert!(matches!(
            clear(&store, false, OutputFormat::Pretty),
            Err(CcfError::InvalidInput(_))
        ));
        assert_eq!(store.count().unwrap(), 1);

        clear(&store, true, OutputFormat::Pretty).unwrap();
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_reasons_json() {
        let out = reasons(&Config::default(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["items"][0], "Rhythm/Analysis");
    }
}
