use crate::model::tool::Tool;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Durable fact that a user consumed their check attempt for a submission.
///
/// Keyed by (user, tool, filename, content fingerprint). Never updated; only
/// removed by an administrative reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckRecord {
    pub user_id: i64,
    pub username: String,
    pub tool: Tool,
    pub filename: String,
    pub code_hash: String,
    /// Normalized source text, kept so exports can reproduce it.
    pub source: String,
    pub checked_at: DateTime<Utc>,
}

/// A persisted scoring result for one annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredFeedback {
    pub line_number: usize,
    /// Equal to `line_number` for comments; last line of a debug block.
    pub end_line: usize,
    pub annotation: String,
    /// Verdict category slug, e.g. `too-short`.
    pub verdict: String,
    pub message: String,
    pub code_hash: String,
    pub created_at: DateTime<Utc>,
}

/// One row of a user's check history grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckedFile {
    pub filename: String,
    pub comment: bool,
    pub debug: bool,
}

/// What an administrative reset removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetSummary {
    pub user_id: i64,
    pub check_records: usize,
    pub feedback_rows: usize,
}
