use serde::{Deserialize, Serialize};

/// A unit of source text extracted for scoring.
///
/// Line numbers are 1-based and refer to the submitted text after line-ending
/// normalization; they are never renumbered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Annotation {
    /// The text from the first `#` of a line to its end, trimmed.
    Comment { line_number: usize, text: String },
    /// A maximal run of consecutive `# DEBUG` marker lines. Each entry of
    /// `lines` is prefixed with its line number, e.g. `"12: # DEBUG FIX: ..."`.
    DebugBlock {
        start_line: usize,
        end_line: usize,
        lines: Vec<String>,
    },
}

impl Annotation {
    pub fn first_line(&self) -> usize {
        match self {
            Annotation::Comment { line_number, .. } => *line_number,
            Annotation::DebugBlock { start_line, .. } => *start_line,
        }
    }

    pub fn last_line(&self) -> usize {
        match self {
            Annotation::Comment { line_number, .. } => *line_number,
            Annotation::DebugBlock { end_line, .. } => *end_line,
        }
    }

    /// The annotation as a single string; debug block lines are joined with `\n`.
    pub fn text(&self) -> String {
        match self {
            Annotation::Comment { text, .. } => text.clone(),
            Annotation::DebugBlock { lines, .. } => lines.join("\n"),
        }
    }
}
