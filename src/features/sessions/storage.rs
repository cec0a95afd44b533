//! Session storage.
//!
//! Persists finished sessions and their pause logs to the local database.

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::{PauseEvent, ReasonSet, SessionRecord, SessionSink};
use crate::error::CcfError;
use crate::storage::Database;

/// A saved session and its database id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub id: i64,
    #[serde(flatten)]
    pub record: SessionRecord,
}

/// Storage for finished sessions.
pub struct SessionStore {
    db: Database,
    max_sessions: u32,
}

const SESSION_COLUMNS: &str =
    "id, started_at, ended_at, compression_ms, hands_off_ms";

impl SessionStore {
    /// Create storage with an existing database connection.
    ///
    /// `max_sessions` of zero disables pruning.
    #[must_use]
    pub const fn with_database(db: Database, max_sessions: u32) -> Self {
        Self { db, max_sessions }
    }

    /// Insert a record and its pauses. Returns the new id.
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails; nothing is written in that case.
    pub fn insert(&mut self, record: &SessionRecord) -> Result<i64, CcfError> {
        let tx = self
            .db
            .connection_mut()
            .transaction()
            .map_err(|e| CcfError::Database(format!("Failed to begin transaction: {e}")))?;

        tx.execute(
            r"INSERT INTO sessions
              (started_at, ended_at, total_ms, compression_ms, hands_off_ms, ccf_percent, pause_count)
              VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                record.started_at.to_rfc3339(),
                record.ended_at.to_rfc3339(),
                to_sql_ms(record.total_ms)?,
                to_sql_ms(record.compression_ms)?,
                to_sql_ms(record.hands_off_ms)?,
                record.ccf_percent,
                record.pause_count,
            ],
        )
        .map_err(|e| CcfError::Database(format!("Failed to insert session: {e}")))?;

        let id = tx.last_insert_rowid();

        for (seq, pause) in record.pause_log.iter().enumerate() {
            let reasons = serde_json::to_string(&pause.reasons)?;
            tx.execute(
                r"INSERT INTO pauses
                  (session_id, seq, offset_ms, started_at, ended_at, duration_ms, reasons)
                  VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    id,
                    i64::try_from(seq).unwrap_or(i64::MAX),
                    to_sql_ms(pause.offset_ms)?,
                    pause.started_at.to_rfc3339(),
                    pause.ended_at.to_rfc3339(),
                    to_sql_ms(pause.duration_ms)?,
                    reasons,
                ],
            )
            .map_err(|e| CcfError::Database(format!("Failed to insert pause: {e}")))?;
        }

        tx.commit()
            .map_err(|e| CcfError::Database(format!("Failed to commit session: {e}")))?;

        info!(id, pauses = record.pause_log.len(), "session saved");
        self.prune()?;
        Ok(id)
    }

    /// Drop the oldest sessions beyond `max_sessions`.
    fn prune(&self) -> Result<usize, CcfError> {
        if self.max_sessions == 0 {
            return Ok(0);
        }

        let removed = self
            .db
            .connection()
            .execute(
                r"DELETE FROM sessions WHERE id IN (
                    SELECT id FROM sessions
                    ORDER BY ended_at DESC, id DESC
                    LIMIT -1 OFFSET ?1
                  )",
                [self.max_sessions],
            )
            .map_err(|e| CcfError::Database(format!("Failed to prune sessions: {e}")))?;

        if removed > 0 {
            debug!(removed, "pruned old sessions");
        }
        Ok(removed)
    }

    /// Get a session by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get(&self, id: i64) -> Result<Option<StoredSession>, CcfError> {
        let row = self
            .db
            .connection()
            .query_row(
                &format!("SELECT {SESSION_COLUMNS} FROM sessions WHERE id = ?1"),
                [id],
                row_to_parts,
            )
            .optional()
            .map_err(|e| CcfError::Database(format!("Failed to query session: {e}")))?;

        row.map(|parts| self.assemble(parts)).transpose()
    }

    /// Get the most recent sessions, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn recent(&self, limit: usize) -> Result<Vec<StoredSession>, CcfError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.query(
            &format!(
                "SELECT {SESSION_COLUMNS} FROM sessions ORDER BY ended_at DESC, id DESC LIMIT ?1"
            ),
            &[&limit],
        )
    }

    /// Get sessions started in `[start, end)`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<StoredSession>, CcfError> {
        self.query(
            &format!(
                "SELECT {SESSION_COLUMNS} FROM sessions
                 WHERE started_at >= ?1 AND started_at < ?2
                 ORDER BY started_at DESC, id DESC"
            ),
            &[&start.to_rfc3339(), &end.to_rfc3339()],
        )
    }

    /// Delete a session. Returns `false` if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete(&self, id: i64) -> Result<bool, CcfError> {
        let rows = self
            .db
            .connection()
            .execute("DELETE FROM sessions WHERE id = ?1", [id])
            .map_err(|e| CcfError::Database(format!("Failed to delete session: {e}")))?;

        Ok(rows > 0)
    }

    /// Delete every session. Returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_all(&self) -> Result<usize, CcfError> {
        self.db
            .connection()
            .execute("DELETE FROM sessions", [])
            .map_err(|e| CcfError::Database(format!("Failed to delete sessions: {e}")))
    }

    /// Number of saved sessions.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count(&self) -> Result<u64, CcfError> {
        let count: i64 = self
            .db
            .connection()
            .query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))
            .map_err(|e| CcfError::Database(format!("Failed to count sessions: {e}")))?;

        Ok(u64::try_from(count).unwrap_or(0))
    }

    fn query(
        &self,
        sql: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<StoredSession>, CcfError> {
        let conn = self.db.connection();
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| CcfError::Database(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map(params, row_to_parts)
            .map_err(|e| CcfError::Database(format!("Failed to query sessions: {e}")))?;

        let mut sessions = Vec::new();
        for row in rows {
            let parts = row.map_err(|e| CcfError::Database(e.to_string()))?;
            sessions.push(self.assemble(parts)?);
        }
        Ok(sessions)
    }

    fn assemble(&self, parts: SessionParts) -> Result<StoredSession, CcfError> {
        let pause_log = self.pauses_for(parts.id)?;
        Ok(StoredSession {
            id: parts.id,
            record: SessionRecord::from_parts(
                parts.started_at,
                parts.ended_at,
                parts.compression_ms,
                parts.hands_off_ms,
                pause_log,
            ),
        })
    }

    fn pauses_for(&self, session_id: i64) -> Result<Vec<PauseEvent>, CcfError> {
        let conn = self.db.connection();
        let mut stmt = conn
            .prepare(
                r"SELECT offset_ms, started_at, ended_at, duration_ms, reasons
                  FROM pauses WHERE session_id = ?1 ORDER BY seq",
            )
            .map_err(|e| CcfError::Database(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map([session_id], |row| {
                Ok((
                    from_sql_ms(row.get(0)?),
                    parse_time(&row.get::<_, String>(1)?),
                    parse_time(&row.get::<_, String>(2)?),
                    from_sql_ms(row.get(3)?),
                    row.get::<_, String>(4)?,
                ))
            })
            .map_err(|e| CcfError::Database(format!("Failed to query pauses: {e}")))?;

        let mut pauses = Vec::new();
        for row in rows {
            let (offset_ms, started_at, ended_at, duration_ms, reasons) =
                row.map_err(|e| CcfError::Database(e.to_string()))?;
            let reasons: ReasonSet = serde_json::from_str(&reasons)?;
            pauses.push(PauseEvent {
                offset_ms,
                started_at,
                ended_at,
                duration_ms,
                reasons,
            });
        }
        Ok(pauses)
    }
}

impl SessionSink for SessionStore {
    fn save_session(&mut self, record: &SessionRecord) -> Result<i64, CcfError> {
        self.insert(record)
    }
}

struct SessionParts {
    id: i64,
    started_at: DateTime<Utc>,
    ended_at: DateTime<Utc>,
    compression_ms: u64,
    hands_off_ms: u64,
}

fn row_to_parts(row: &Row<'_>) -> Result<SessionParts, rusqlite::Error> {
    Ok(SessionParts {
        id: row.get(0)?,
        started_at: parse_time(&row.get::<_, String>(1)?),
        ended_at: parse_time(&row.get::<_, String>(2)?),
        compression_ms: from_sql_ms(row.get(3)?),
        hands_off_ms: from_sql_ms(row.get(4)?),
    })
}

fn parse_time(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).map_or(DateTime::UNIX_EPOCH, |t| t.with_timezone(&Utc))
}

fn to_sql_ms(ms: u64) -> Result<i64, CcfError> {
    i64::try_from(ms).map_err(|_| CcfError::InvalidInput(format!("Duration too large: {ms} ms")))
}

fn from_sql_ms(ms: i64) -> u64 {
    u64::try_from(ms).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PauseReason, SessionTimer};
    use chrono::TimeZone;

    fn create_test_store(max_sessions: u32) -> SessionStore {
        let db = Database::open_in_memory().unwrap();
        SessionStore::with_database(db, max_sessions)
    }

    fn sample_record(minute: u32) -> SessionRecord {
        let mut timer = SessionTimer::new();
        timer
            .start_at(Utc.with_ymd_and_hms(2024, 3, 1, 10, minute, 0).unwrap())
            .unwrap();
        timer.tick(60_000);
        timer
            .pause(["Shock", "Pulse Check"].iter().filter_map(|r| PauseReason::new(r)))
            .unwrap();
        timer.tick(8_000);
        timer.resume().unwrap();
        timer.tick(30_000);
        timer.pause(Vec::new()).unwrap();
        timer.tick(2_000);
        timer.end().unwrap()
    }

    #[test]
    fn test_save_and_get() {
        let mut store = create_test_store(200);
        let record = sample_record(0);

        let id = store.save_session(&record).unwrap();
        let loaded = store.get(id).unwrap().unwrap();

        assert_eq!(loaded.id, id);
        assert_eq!(loaded.record, record);
        assert_eq!(loaded.record.ccf_percent, Some(90));
        assert_eq!(loaded.record.pause_log[0].reasons.len(), 2);
    }

    #[test]
    fn test_get_missing() {
        let store = create_test_store(200);
        assert!(store.get(42).unwrap().is_none());
    }

    #[test]
    fn test_recent_newest_first() {
        let mut store = create_test_store(200);
        for minute in 0..5 {
            store.insert(&sample_record(minute * 10)).unwrap();
        }

        let recent = store.recent(3).unwrap();
        assert_eq!(recent.len(), 3);
        assert!(recent[0].record.started_at > recent[1].record.started_at);
    }

    #[test]
    fn test_range() {
        let mut store = create_test_store(200);
        store.insert(&sample_record(0)).unwrap();
        store.insert(&sample_record(30)).unwrap();

        let start = Utc.with_ymd_and_hms(2024, 3, 1, 10, 15, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap();
        let sessions = store.range(start, end).unwrap();
        assert_eq!(sessions.len(), 1);
    }

    #[test]
    fn test_delete_cascades_pauses() {
        let mut store = create_test_store(200);
        let id = store.insert(&sample_record(0)).unwrap();

        assert!(store.delete(id).unwrap());
        assert!(!store.delete(id).unwrap());
        assert!(store.get(id).unwrap().is_none());

        let pauses: i64 = store
            .db
            .connection()
            .query_row("SELECT COUNT(*) FROM pauses", [], |row| row.get(0))
            .unwrap();
        assert_eq!(pauses, 0);
    }

    #[test]
    fn test_prune_keeps_newest() {
        let mut store = create_test_store(3);
        let mut ids = Vec::new();
        for minute in 0..5 {
            ids.push(store.insert(&sample_record(minute * 10)).unwrap());
        }

        assert_eq!(store.count().unwrap(), 3);
        assert!(store.get(ids[0]).unwrap().is_none());
        assert!(store.get(ids[4]).unwrap().is_some());
    }

    #[test]
    fn test_delete_all() {
        let mut store = create_test_store(0);
        store.insert(&sample_record(0)).unwrap();
        store.insert(&sample_record(1)).unwrap();

        assert_eq!(store.delete_all().unwrap(), 2);
        assert_eq!(store.count().unwrap(), 0);
    }
}
