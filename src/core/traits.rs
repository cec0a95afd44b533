//! Boundary traits between the timer core and its hosts.

use crate::core::record::SessionRecord;
use crate::error::CcfError;

/// Receives finished session records.
///
/// The timer core only ever writes through this trait; it never reads
/// saved sessions back.
#[cfg_attr(test, mockall::automock)]
pub trait SessionSink {
    /// Persist a record, returning the identifier it was stored under.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be stored.
    fn save_session(&mut self, record: &SessionRecord) -> Result<i64, CcfError>;
}

/// In-memory sink, mostly useful for scripted runs and tests.
impl SessionSink for Vec<SessionRecord> {
    fn save_session(&mut self, record: &SessionRecord) -> Result<i64, CcfError> {
        self.push(record.clone());
        i64::try_from(self.len())
            .map_err(|e| CcfError::InvalidInput(format!("Too many sessions: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_vec_sink_assigns_sequential_ids() {
        let mut sink: Vec<SessionRecord> = Vec::new();
        let now = Utc::now();
        let record = SessionRecord::from_parts(now, now, 1_000, 0, Vec::new());

        assert_eq!(sink.save_session(&record).unwrap(), 1);
        assert_eq!(sink.save_session(&record).unwrap(), 2);
        assert_eq!(sink.len(), 2);
    }
}
