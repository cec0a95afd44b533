//! Report command implementation.

use crate::cli::args::OutputFormat;
use crate::error::CcfError;
use crate::features::sessions::{ReportPeriod, SessionReport, SessionStore};
use crate::output::format_report;

/// Execute report command
///
/// # Errors
///
/// Returns an error for an unknown period or if the sessions cannot be
/// loaded.
pub fn report(
    store: &SessionStore,
    period: &str,
    target: u8,
    format: OutputFormat,
) -> Result<String, CcfError> {
    let period = ReportPeriod::parse(period)?;
    let report = SessionReport::generate(store, period, target)?;
    format_report(&report, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SessionTimer;
    use crate::storage::Database;

    #[test]
    fn test_report_json_counts_today() {
        let db = Database::open_in_memory().unwrap();
        let mut store = SessionStore::with_database(db, 0);
        let mut timer = SessionTimer::new();
        timer.start().unwrap();
        timer.tick(90_000);
        store.insert(&timer.end().unwrap()).unwrap();

        let out = report(&store, "all", 80, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["session_count"], 1);
        assert_eq!(value["sessions_meeting_target"], 1);
    }

    #[test]
    fn test_unknown_period() {
        let db = Database::open_in_memory().unwrap();
        let store = SessionStore::with_database(db, 0);
        assert!(matches!(
            report(&store, "fortnight", 80, OutputFormat::Pretty),
            Err(CcfError::InvalidInput(_))
        ));
    }
}
