use crate::engine::ScoredAnnotation;
use crate::storage::error::map_insert_error;
use crate::storage::{Store, StoreError};
use chrono::Utc;
use common::model::check::{CheckRecord, CheckedFile, ResetSummary};
use common::model::tool::Tool;
use common::model::user::Identity;
use log::{debug, info};
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension, Row, TransactionBehavior};
use std::collections::BTreeMap;

/// Identifies one submission in the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerKey {
    pub user_id: i64,
    pub tool: Tool,
    pub filename: String,
    pub code_hash: String,
}

/// What happened to an attempt, as written to the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Scored,
    NoAnnotations,
    AlreadyChecked,
    /// Lost the insert race to a concurrent request for the same key.
    Conflict,
}

impl AttemptOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttemptOutcome::Scored => "scored",
            AttemptOutcome::NoAnnotations => "no-annotations",
            AttemptOutcome::AlreadyChecked => "already-checked",
            AttemptOutcome::Conflict => "conflict",
        }
    }
}

const RECORD_COLUMNS: &str =
    "user_id, username, tool, filename, code_hash, source, checked_at";

pub(crate) fn tool_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Tool> {
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e: String| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, e.into()))
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<CheckRecord> {
    Ok(CheckRecord {
        user_id: row.get(0)?,
        username: row.get(1)?,
        tool: tool_column(row, 2)?,
        filename: row.get(3)?,
        code_hash: row.get(4)?,
        source: row.get(5)?,
        checked_at: row.get(6)?,
    })
}

impl Store {
    /// The record for `key`, if the submission was already checked.
    pub fn find_record(&self, key: &LedgerKey) -> Result<Option<CheckRecord>, StoreError> {
        let conn = self.connect()?;
        let record = conn
            .query_row(
                &format!(
                    "SELECT {} FROM check_records \
                     WHERE user_id = ?1 AND tool = ?2 AND filename = ?3 AND code_hash = ?4",
                    RECORD_COLUMNS
                ),
                params![key.user_id, key.tool.as_str(), key.filename, key.code_hash],
                record_from_row,
            )
            .optional()?;
        Ok(record)
    }

    /// The most recent record for a filename, whatever its content.
    pub fn latest_record(
        &self,
        user_id: i64,
        tool: Tool,
        filename: &str,
    ) -> Result<Option<CheckRecord>, StoreError> {
        let conn = self.connect()?;
        let record = conn
            .query_row(
                &format!(
                    "SELECT {} FROM check_records \
                     WHERE user_id = ?1 AND tool = ?2 AND filename = ?3 \
                     ORDER BY checked_at DESC, id DESC LIMIT 1",
                    RECORD_COLUMNS
                ),
                params![user_id, tool.as_str(), filename],
                record_from_row,
            )
            .optional()?;
        Ok(record)
    }

    /// Records the check and its feedback atomically.
    ///
    /// For students the insert must create the record; an existing key yields
    /// [`StoreError::Conflict`] and the transaction is rolled back. Teachers
    /// are never blocked: their record is refreshed and its rows are replaced.
    pub fn commit_check(
        &self,
        identity: &Identity,
        key: &LedgerKey,
        source: &str,
        scored: &[ScoredAnnotation],
    ) -> Result<(), StoreError> {
        let mut conn = self.connect()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let now = Utc::now();

        // A teacher re-check refreshes the record so it becomes the latest one.
        let insert = format!(
            "INSERT INTO check_records ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7){}",
            RECORD_COLUMNS,
            if identity.is_teacher {
                " ON CONFLICT(user_id, tool, filename, code_hash) DO UPDATE SET \
                 username = excluded.username, source = excluded.source, \
                 checked_at = excluded.checked_at"
            } else {
                ""
            }
        );
        tx.execute(
            &insert,
            params![
                key.user_id,
                identity.username,
                key.tool.as_str(),
                key.filename,
                key.code_hash,
                source,
                now
            ],
        )
        .map_err(map_insert_error)?;

        if identity.is_teacher {
            let replaced = tx.execute(
                "DELETE FROM stored_feedback \
                 WHERE user_id = ?1 AND tool = ?2 AND filename = ?3 AND code_hash = ?4",
                params![key.user_id, key.tool.as_str(), key.filename, key.code_hash],
            )?;
            if replaced > 0 {
                debug!("replacing {} feedback rows for teacher {}", replaced, key.user_id);
            }
        }

        {
            let mut stmt = tx.prepare(
                "INSERT INTO stored_feedback \
                 (user_id, tool, filename, code_hash, line_num, end_line, annotation, verdict, feedback, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;
            for item in scored {
                stmt.execute(params![
                    key.user_id,
                    key.tool.as_str(),
                    key.filename,
                    key.code_hash,
                    item.annotation.first_line() as i64,
                    item.annotation.last_line() as i64,
                    item.annotation.text(),
                    item.verdict.category(),
                    item.verdict.message(),
                    now
                ])?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    pub fn log_attempt(
        &self,
        identity: &Identity,
        key: &LedgerKey,
        outcome: AttemptOutcome,
    ) -> Result<(), StoreError> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO check_attempts \
             (user_id, username, is_teacher, tool, filename, code_hash, outcome, attempted_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                identity.id,
                identity.username,
                identity.is_teacher,
                key.tool.as_str(),
                key.filename,
                key.code_hash,
                outcome.as_str(),
                Utc::now()
            ],
        )?;
        Ok(())
    }

    /// Filenames the user has checked, with a flag per tool, sorted by name.
    pub fn checked_files(&self, user_id: i64) -> Result<Vec<CheckedFile>, StoreError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT DISTINCT filename, tool FROM check_records WHERE user_id = ?1",
        )?;
        let rows = stmt.query_map(params![user_id], |row| {
            Ok((row.get::<_, String>(0)?, tool_column(row, 1)?))
        })?;

        let mut grid: BTreeMap<String, CheckedFile> = BTreeMap::new();
        for row in rows {
            let (filename, tool) = row?;
            let entry = grid.entry(filename.clone()).or_insert(CheckedFile {
                filename,
                comment: false,
                debug: false,
            });
            match tool {
                Tool::Comment => entry.comment = true,
                Tool::Debug => entry.debug = true,
            }
        }
        Ok(grid.into_values().collect())
    }

    /// Clears a user's check records and stored feedback, for one tool or for
    /// both when `tool` is `None`. The attempt log is left untouched.
    pub fn reset_user(&self, user_id: i64, tool: Option<Tool>) -> Result<ResetSummary, StoreError> {
        let mut conn = self.connect()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let tool_filter = tool.map(|t| t.as_str());
        let feedback_rows = tx.execute(
            "DELETE FROM stored_feedback WHERE user_id = ?1 AND (?2 IS NULL OR tool = ?2)",
            params![user_id, tool_filter],
        )?;
        let check_records = tx.execute(
            "DELETE FROM check_records WHERE user_id = ?1 AND (?2 IS NULL OR tool = ?2)",
            params![user_id, tool_filter],
        )?;
        tx.commit()?;

        info!(
            "reset user {} ({}): removed {} check records and {} feedback rows",
            user_id,
            tool_filter.unwrap_or("all tools"),
            check_records,
            feedback_rows
        );
        Ok(ResetSummary {
            user_id,
            check_records,
            feedback_rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::score;
    use crate::storage::test_support::temp_store;
    use rstest::{fixture, rstest};
    use std::sync::{Arc, Barrier};
    use std::thread;

    const SOURCE: &str = "x = 10  # set x to 10\n# explains the loop that follows\n";

    #[fixture]
    fn student() -> Identity {
        Identity {
            id: 7,
            username: "student".into(),
            is_teacher: false,
        }
    }

    #[fixture]
    fn teacher() -> Identity {
        Identity {
            id: 1,
            username: "teacher".into(),
            is_teacher: true,
        }
    }

    fn key_for(identity: &Identity, tool: Tool, filename: &str) -> LedgerKey {
        LedgerKey {
            user_id: identity.id,
            tool,
            filename: filename.into(),
            code_hash: "abc123".into(),
        }
    }

    #[rstest]
    fn commit_then_find(student: Identity) {
        let (_dir, store) = temp_store();
        let key = key_for(&student, Tool::Comment, "camp.py");
        assert!(store.find_record(&key).expect("find").is_none());

        store
            .commit_check(&student, &key, SOURCE, &score(Tool::Comment, SOURCE))
            .expect("commit");

        let record = store.find_record(&key).expect("find").expect("record");
        assert_eq!(record.filename, "camp.py");
        assert_eq!(record.source, SOURCE);
        assert_eq!(store.load_feedback(&key).expect("load").len(), 2);
    }

    #[rstest]
    fn second_student_commit_conflicts_and_writes_nothing(student: Identity) {
        let (_dir, store) = temp_store();
        let key = key_for(&student, Tool::Comment, "camp.py");
        let scored = score(Tool::Comment, SOURCE);
        store.commit_check(&student, &key, SOURCE, &scored).expect("first commit");

        let second = store.commit_check(&student, &key, SOURCE, &scored);
        assert!(matches!(second, Err(StoreError::Conflict)));
        assert_eq!(store.load_feedback(&key).expect("load").len(), scored.len());
    }

    #[rstest]
    fn teacher_recommit_replaces_rows(teacher: Identity) {
        let (_dir, store) = temp_store();
        let key = key_for(&teacher, Tool::Comment, "demo.py");
        let scored = score(Tool::Comment, SOURCE);
        store.commit_check(&teacher, &key, SOURCE, &scored).expect("first");
        store.commit_check(&teacher, &key, SOURCE, &scored).expect("second");
        assert_eq!(store.load_feedback(&key).expect("load").len(), scored.len());
    }

    #[rstest]
    fn concurrent_first_commits_admit_exactly_one(student: Identity) {
        let (_dir, store) = temp_store();
        let key = key_for(&student, Tool::Debug, "race.py");
        let source = "# DEBUG TEST: a\n# DEBUG ISSUE: b\n# DEBUG FIX: c\n";
        let scored = score(Tool::Debug, source);
        let barrier = Arc::new(Barrier::new(2));

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let store = store.clone();
                let key = key.clone();
                let identity = student.clone();
                let scored = scored.clone();
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    store.commit_check(&identity, &key, source, &scored)
                })
            })
            .collect();
        let results: Vec<_> = handles
            .into_iter()
            .map(|h| h.join().expect("thread"))
            .collect();

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(StoreError::Conflict))));
        assert_eq!(store.load_feedback(&key).expect("load").len(), 1);
    }

    #[rstest]
    fn history_merges_tools_per_filename(student: Identity) {
        let (_dir, store) = temp_store();
        for (tool, name) in [
            (Tool::Comment, "b.py"),
            (Tool::Debug, "b.py"),
            (Tool::Debug, "a.py"),
        ] {
            store
                .commit_check(&student, &key_for(&student, tool, name), "", &[])
                .expect("commit");
        }

        let files = store.checked_files(student.id).expect("history");
        assert_eq!(
            files,
            vec![
                CheckedFile {
                    filename: "a.py".into(),
                    comment: false,
                    debug: true
                },
                CheckedFile {
                    filename: "b.py".into(),
                    comment: true,
                    debug: true
                },
            ]
        );
    }

    #[rstest]
    fn reset_clears_both_tools_but_keeps_audit_log(student: Identity, teacher: Identity) {
        let (_dir, store) = temp_store();
        let comment_key = key_for(&student, Tool::Comment, "camp.py");
        let debug_key = key_for(&student, Tool::Debug, "camp.py");
        store
            .commit_check(&student, &comment_key, SOURCE, &score(Tool::Comment, SOURCE))
            .expect("commit comment");
        store
            .commit_check(&student, &debug_key, SOURCE, &[])
            .expect("commit debug");
        store
            .log_attempt(&student, &comment_key, AttemptOutcome::Scored)
            .expect("log");
        let other_key = key_for(&teacher, Tool::Comment, "camp.py");
        store
            .commit_check(&teacher, &other_key, SOURCE, &[])
            .expect("commit teacher");

        let summary = store.reset_user(student.id, None).expect("reset");
        assert_eq!(summary.check_records, 2);
        assert_eq!(summary.feedback_rows, 2);
        assert!(store.find_record(&comment_key).expect("find").is_none());
        assert!(store.find_record(&other_key).expect("find").is_some());

        let conn = store.connect().expect("connect");
        let attempts: i64 = conn
            .query_row("SELECT COUNT(*) FROM check_attempts", [], |row| row.get(0))
            .expect("count");
        assert_eq!(attempts, 1);
    }

    #[rstest]
    fn reset_can_target_a_single_tool(student: Identity) {
        let (_dir, store) = temp_store();
        let comment_key = key_for(&student, Tool::Comment, "camp.py");
        let debug_key = key_for(&student, Tool::Debug, "camp.py");
        store
            .commit_check(&student, &comment_key, SOURCE, &score(Tool::Comment, SOURCE))
            .expect("commit comment");
        store
            .commit_check(&student, &debug_key, SOURCE, &[])
            .expect("commit debug");

        let summary = store
            .reset_user(student.id, Some(Tool::Debug))
            .expect("reset");
        assert_eq!(summary.check_records, 1);
        assert_eq!(summary.feedback_rows, 0);
        assert!(store.find_record(&debug_key).expect("find").is_none());
        assert!(store.find_record(&comment_key).expect("find").is_some());
    }
}
