//! Turns stored feedback into display rows and printable reports.

pub mod pdf;

use crate::engine::scanner::{scan, SourceLine};
use crate::engine::summary::{debug_summary, empty_message};
use crate::engine::ScoredAnnotation;
use chrono::NaiveDate;
use common::model::check::StoredFeedback;
use common::model::submission::ResultRow;
use common::model::tool::Tool;

/// `"12"` for a single line, `"3-5"` for a range.
pub fn location(first: usize, last: usize) -> String {
    if first == last {
        first.to_string()
    } else {
        format!("{}-{}", first, last)
    }
}

pub fn display_rows(rows: &[StoredFeedback]) -> Vec<ResultRow> {
    rows.iter()
        .map(|row| ResultRow {
            location: location(row.line_number, row.end_line),
            annotation: row.annotation.clone(),
            verdict: row.verdict.clone(),
            feedback: row.message.clone(),
        })
        .collect()
}

/// Same shape as [`display_rows`], straight from a fresh scoring pass.
pub fn scored_rows(scored: &[ScoredAnnotation]) -> Vec<ResultRow> {
    scored
        .iter()
        .map(|item| ResultRow {
            location: location(item.annotation.first_line(), item.annotation.last_line()),
            annotation: item.annotation.text(),
            verdict: item.verdict.category().to_string(),
            feedback: item.verdict.message(),
        })
        .collect()
}

/// One annotation in a report with its indented feedback line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub lines: Vec<String>,
    pub feedback: String,
}

/// Everything the PDF renderer needs, already in print order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub tool: Tool,
    pub filename: String,
    pub date: NaiveDate,
    pub source: Vec<SourceLine>,
    pub entries: Vec<ReportEntry>,
    /// Set when nothing was extracted.
    pub empty_notice: Option<String>,
    pub summary: Option<String>,
}

impl Report {
    pub fn build(
        tool: Tool,
        filename: &str,
        date: NaiveDate,
        source_text: &str,
        rows: &[StoredFeedback],
    ) -> Self {
        let source = scan(source_text);
        let mut ordered: Vec<&StoredFeedback> = rows.iter().collect();
        ordered.sort_by_key(|row| row.line_number);

        let entries = ordered
            .into_iter()
            .map(|row| {
                let lines = match tool {
                    Tool::Comment => vec![format!("Line {}: {}", row.line_number, row.annotation)],
                    Tool::Debug => row.annotation.lines().map(str::to_string).collect(),
                };
                ReportEntry {
                    lines,
                    feedback: format!("Feedback: {}", row.message),
                }
            })
            .collect();

        let empty_notice = rows.is_empty().then(|| empty_message(tool));
        let summary = match tool {
            Tool::Debug => Some(debug_summary(rows.len(), &source)),
            Tool::Comment => None,
        };

        Self {
            tool,
            filename: filename.to_string(),
            date,
            source,
            entries,
            empty_notice,
            summary,
        }
    }

    pub fn heading(&self) -> &'static str {
        match self.tool {
            Tool::Comment => "Comment Checker - Feedback",
            Tool::Debug => "Debug Checker - Extracted Debug Blocks",
        }
    }

    /// Attachment name, e.g. `camp.py_feedback_2024-05-01.pdf`.
    pub fn download_name(&self) -> String {
        let safe: String = self
            .filename
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        let kind = match self.tool {
            Tool::Comment => "feedback",
            Tool::Debug => "debug_blocks",
        };
        format!("{}_{}_{}.pdf", safe, kind, self.date.format("%Y-%m-%d"))
    }
}
