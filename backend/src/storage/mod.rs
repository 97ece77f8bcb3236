//! # Submission Ledger
//!
//! SQLite persistence for check records, stored feedback and the attempt
//! audit log. A connection is opened per operation, so the store itself is a
//! cheap, clonable handle on the database path.
//!
//! The one-attempt rule is enforced by the `UNIQUE` key on `check_records`:
//! the record and its feedback rows are written in one transaction, and a
//! second writer for the same key fails with [`StoreError::Conflict`] without
//! writing anything.

mod error;
mod feedback;
mod ledger;

pub use error::StoreError;
pub use ledger::{AttemptOutcome, LedgerKey};

use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::Duration;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS check_records (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     INTEGER NOT NULL,
    username    TEXT    NOT NULL,
    tool        TEXT    NOT NULL,
    filename    TEXT    NOT NULL,
    code_hash   TEXT    NOT NULL,
    source      TEXT    NOT NULL,
    checked_at  TEXT    NOT NULL,
    UNIQUE (user_id, tool, filename, code_hash)
);

CREATE TABLE IF NOT EXISTS stored_feedback (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     INTEGER NOT NULL,
    tool        TEXT    NOT NULL,
    filename    TEXT    NOT NULL,
    code_hash   TEXT    NOT NULL,
    line_num    INTEGER NOT NULL,
    end_line    INTEGER NOT NULL,
    annotation  TEXT    NOT NULL,
    verdict     TEXT    NOT NULL,
    feedback    TEXT    NOT NULL,
    created_at  TEXT    NOT NULL
);

CREATE INDEX IF NOT EXISTS stored_feedback_key
    ON stored_feedback (user_id, tool, filename, code_hash);

CREATE TABLE IF NOT EXISTS check_attempts (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id       INTEGER NOT NULL,
    username      TEXT    NOT NULL,
    is_teacher    INTEGER NOT NULL,
    tool          TEXT    NOT NULL,
    filename      TEXT    NOT NULL,
    code_hash     TEXT    NOT NULL,
    outcome       TEXT    NOT NULL,
    attempted_at  TEXT    NOT NULL
);
";

#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Opens the database and creates the tables if they do not exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let store = Self::new(path);
        store.init_schema()?;
        Ok(store)
    }

    pub fn init_schema(&self) -> Result<(), StoreError> {
        let conn = self.connect()?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    pub(crate) fn connect(&self) -> Result<Connection, StoreError> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(conn)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Store;
    use tempfile::TempDir;

    /// A store on a fresh database file; keep the `TempDir` alive for the test.
    pub fn temp_store() -> (TempDir, Store) {
        let dir = TempDir::new().expect("create temp dir");
        let store = Store::open(dir.path().join("feedback.sqlite")).expect("open store");
        (dir, store)
    }
}
