//! Database migrations for ccf.
//!
//! Each migration upgrades the schema by one version. Migrations run
//! automatically when the database is opened.

use rusqlite::Connection;

use crate::error::CcfError;

/// Current schema version.
const CURRENT_VERSION: i32 = 1;

/// Get the current schema version from the database.
///
/// Returns 0 for a new database.
pub fn get_version(conn: &Connection) -> Result<i32, CcfError> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| CcfError::Database(format!("Failed to get schema version: {e}")))
}

fn set_version(conn: &Connection, version: i32) -> Result<(), CcfError> {
    conn.execute_batch(&format!("PRAGMA user_version = {version};"))
        .map_err(|e| CcfError::Database(format!("Failed to set schema version: {e}")))
}

/// Run all pending migrations.
pub fn run(conn: &Connection) -> Result<(), CcfError> {
    let current = get_version(conn)?;

    for version in (current + 1)..=CURRENT_VERSION {
        tracing::debug!(version, "running migration");
        run_migration(conn, version)?;
        set_version(conn, version)?;
    }

    Ok(())
}

fn run_migration(conn: &Connection, version: i32) -> Result<(), CcfError> {
    match version {
        1 => migrate_v1(conn),
        _ => Err(CcfError::Database(format!(
            "Unknown migration version: {version}"
        ))),
    }
}

/// Migration v1: sessions and their pause logs.
///
/// `pauses.reasons` is a JSON array of reason labels.
fn migrate_v1(conn: &Connection) -> Result<(), CcfError> {
    conn.execute_batch(
        r"
        CREATE TABLE IF NOT EXISTS sessions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            started_at TEXT NOT NULL,
            ended_at TEXT NOT NULL,
            total_ms INTEGER NOT NULL,
            compression_ms INTEGER NOT NULL,
            hands_off_ms INTEGER NOT NULL,
            ccf_percent INTEGER,
            pause_count INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_sessions_started
        ON sessions(started_at);

        CREATE TABLE IF NOT EXISTS pauses (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            session_id INTEGER NOT NULL REFERENCES sessions(id) ON DELETE CASCADE,
            seq INTEGER NOT NULL,
            offset_ms INTEGER NOT NULL,
            started_at TEXT NOT NULL,
            ended_at TEXT NOT NULL,
            duration_ms INTEGER NOT NULL,
            reasons TEXT NOT NULL DEFAULT '[]'
        );

        CREATE INDEX IF NOT EXISTS idx_pauses_session
        ON pauses(session_id, seq);
        ",
    )
    .map_err(|e| CcfError::Database(format!("Migration v1 failed: {e}")))
}
