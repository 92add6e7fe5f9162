//! SQLite access for the observatory service.
//!
//! The store is opened per request: `Database` only remembers where the file
//! lives, and `connect` hands back a fresh `rusqlite::Connection` with foreign
//! keys enforced and the journal in WAL mode. Nothing is cached between requests.
//! Writes go through `write_transaction`, which takes the write lock up front.
//!
//! ## Layout
//!
//! - `projects`: one row per teacher project, `project_code` unique.
//! - `project_fields`: form fields, `field_type` restricted by a CHECK constraint.
//! - `observations`: one row per submission.
//! - `observation_data`: one row per (observation, field), with the raw mirror in
//!   `field_value` and one typed column populated.
//!
//! Foreign keys carry no `ON DELETE` action. Deletes remove children first.

use crate::error::ApiError;
use log::info;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::path::PathBuf;
use std::time::Duration;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS projects (
    project_id           INTEGER PRIMARY KEY AUTOINCREMENT,
    teacher_id           INTEGER NOT NULL,
    project_code         CHAR(8) NOT NULL UNIQUE,
    project_title        TEXT,
    project_description  TEXT,
    project_instructions TEXT
);

CREATE INDEX IF NOT EXISTS idx_projects_teacher ON projects(teacher_id);

CREATE TABLE IF NOT EXISTS project_fields (
    field_id       INTEGER PRIMARY KEY AUTOINCREMENT,
    project_id     INTEGER NOT NULL REFERENCES projects(project_id),
    field_name     TEXT NOT NULL,
    field_label    TEXT NOT NULL,
    field_type     TEXT NOT NULL CHECK (field_type IN (
                       'text', 'textarea', 'radio', 'time',
                       'number', 'date', 'checkbox', 'multiselect')),
    field_options  TEXT,
    field_required INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_project_fields_project ON project_fields(project_id);

CREATE TABLE IF NOT EXISTS observations (
    observation_id INTEGER PRIMARY KEY AUTOINCREMENT,
    project_id     INTEGER NOT NULL REFERENCES projects(project_id),
    student_name   TEXT
);

CREATE INDEX IF NOT EXISTS idx_observations_project ON observations(project_id);

CREATE TABLE IF NOT EXISTS observation_data (
    data_id        INTEGER PRIMARY KEY AUTOINCREMENT,
    observation_id INTEGER NOT NULL REFERENCES observations(observation_id),
    field_id       INTEGER NOT NULL REFERENCES project_fields(field_id),
    field_value    TEXT NOT NULL DEFAULT '',
    value_text     TEXT,
    value_number   REAL,
    value_date     TEXT,
    value_boolean  INTEGER,
    UNIQUE (observation_id, field_id)
);

CREATE INDEX IF NOT EXISTS idx_observation_data_field ON observation_data(field_id);
"#;

/// Location of the SQLite file backing the service.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Opens a connection with foreign keys on and a busy timeout set.
    pub fn connect(&self) -> Result<Connection, ApiError> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.query_row("PRAGMA journal_mode = WAL;", [], |_| Ok(()))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(conn)
    }

    /// Creates the tables if they are missing. Safe to call on every start.
    pub fn initialize(&self) -> Result<(), ApiError> {
        let conn = self.connect()?;
        conn.execute_batch(SCHEMA)?;
        info!("Database ready at {}", self.path.display());
        Ok(())
    }
}

/// Opens an IMMEDIATE transaction.
///
/// A deferred transaction that reads before writing cannot wait for the write
/// lock: SQLite reports `SQLITE_BUSY` without consulting the busy timeout. Taking
/// the lock at `BEGIN` lets concurrent writers queue behind `BUSY_TIMEOUT`.
pub fn write_transaction(conn: &mut Connection) -> Result<Transaction<'_>, ApiError> {
    Ok(conn.transaction_with_behavior(TransactionBehavior::Immediate)?)
}

/// A fresh, initialized database in a temporary directory. The directory is
/// removed when the returned guard drops.
#[cfg(test)]
pub(crate) fn test_database() -> (tempfile::TempDir, Database) {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = Database::new(dir.path().join("observatory-test.sqlite"));
    db.initialize().expect("initialize schema");
    (dir, db)
}
