use crate::storage::{LedgerKey, Store, StoreError};
use common::model::check::StoredFeedback;
use rusqlite::types::Type;
use rusqlite::{params, Row};

fn line_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<usize> {
    let raw: i64 = row.get(idx)?;
    usize::try_from(raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Integer, e.into()))
}

fn feedback_from_row(row: &Row<'_>) -> rusqlite::Result<StoredFeedback> {
    Ok(StoredFeedback {
        line_number: line_column(row, 0)?,
        end_line: line_column(row, 1)?,
        annotation: row.get(2)?,
        verdict: row.get(3)?,
        message: row.get(4)?,
        code_hash: row.get(5)?,
        created_at: row.get(6)?,
    })
}

impl Store {
    /// Stored results for a submission, in line order.
    pub fn load_feedback(&self, key: &LedgerKey) -> Result<Vec<StoredFeedback>, StoreError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT line_num, end_line, annotation, verdict, feedback, code_hash, created_at \
             FROM stored_feedback \
             WHERE user_id = ?1 AND tool = ?2 AND filename = ?3 AND code_hash = ?4 \
             ORDER BY line_num ASC, id ASC",
        )?;
        let rows = stmt
            .query_map(
                params![key.user_id, key.tool.as_str(), key.filename, key.code_hash],
                feedback_from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::score;
    use crate::storage::StoreError;
    use rusqlite::params;
    use crate::storage::test_support::temp_store;
    use crate::storage::LedgerKey;
    use common::model::tool::Tool;
    use common::model::user::Identity;

    #[test]
    fn rows_come_back_in_line_order_with_ranges() {
        let (_dir, store) = temp_store();
        let identity = Identity {
            id: 3,
            username: "sam".into(),
            is_teacher: false,
        };
        let source = "# DEBUG: tried X\nx = 1\n# DEBUG TEST: t\n# DEBUG ISSUE: i\n# DEBUG FIX: f\n";
        let key = LedgerKey {
            user_id: 3,
            tool: Tool::Debug,
            filename: "blocks.py".into(),
            code_hash: "h".into(),
        };
        store
            .commit_check(&identity, &key, source, &score(Tool::Debug, source))
            .expect("commit");

        let rows = store.load_feedback(&key).expect("load");
        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].line_number, rows[0].end_line), (1, 1));
        assert_eq!(rows[0].verdict, "incomplete");
        assert_eq!((rows[1].line_number, rows[1].end_line), (3, 5));
        assert_eq!(rows[1].verdict, "complete");
        assert_eq!(
            rows[1].annotation,
            "3: # DEBUG TEST: t\n4: # DEBUG ISSUE: i\n5: # DEBUG FIX: f"
        );
    }

    #[test]
    fn negative_line_numbers_are_rejected_not_wrapped() {
        let (_dir, store) = temp_store();
        let key = LedgerKey {
            user_id: 3,
            tool: Tool::Comment,
            filename: "bad.py".into(),
            code_hash: "h".into(),
        };
        let conn = store.connect().expect("connect");
        conn.execute(
            "INSERT INTO stored_feedback \
             (user_id, tool, filename, code_hash, line_num, end_line, annotation, verdict, feedback, created_at) \
             VALUES (?1, ?2, ?3, ?4, -1, -1, '# x', 'clear', 'ok', ?5)",
            params![key.user_id, key.tool.as_str(), key.filename, key.code_hash, chrono::Utc::now()],
        )
        .expect("insert");

        let result = store.load_feedback(&key);
        assert!(matches!(
            result,
            Err(StoreError::Database(rusqlite::Error::FromSqlConversionFailure(0, _, _)))
        ));
    }
}
