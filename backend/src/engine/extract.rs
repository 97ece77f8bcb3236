//! Extraction policies: which lines of a submission are scored.

use crate::engine::scanner::SourceLine;
use common::model::annotation::Annotation;
use regex::Regex;
use std::sync::LazyLock;

/// `#`, optional whitespace, then `DEBUG` ending on a word boundary.
/// Matches `# DEBUG`, `#DEBUG:` and `# debug test:`, but not `# DEBUGGING`.
static DEBUG_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^#\s*DEBUG\b").expect("debug marker pattern is valid"));

pub fn is_debug_marker(line: &str) -> bool {
    DEBUG_MARKER.is_match(line.trim())
}

/// Emits the text from the first `#` to the end of each line, trimmed.
/// Lines with nothing but whitespace after the `#` are skipped.
pub fn extract_comments(lines: &[SourceLine]) -> Vec<Annotation> {
    lines
        .iter()
        .filter_map(|line| {
            let start = line.text.find('#')?;
            let comment = line.text[start..].trim();
            if comment[1..].trim().is_empty() {
                return None;
            }
            Some(Annotation::Comment {
                line_number: line.number,
                text: comment.to_string(),
            })
        })
        .collect()
}

/// Groups consecutive debug marker lines into blocks.
///
/// A non-marker line always closes the open block, so blocks never span a gap.
pub fn extract_debug_blocks(lines: &[SourceLine]) -> Vec<Annotation> {
    let mut blocks = Vec::new();
    let mut current: Vec<&SourceLine> = Vec::new();

    for line in lines {
        if is_debug_marker(&line.text) {
            current.push(line);
        } else if !current.is_empty() {
            blocks.push(close_block(&current));
            current.clear();
        }
    }
    if !current.is_empty() {
        blocks.push(close_block(&current));
    }

    blocks
}

fn close_block(block: &[&SourceLine]) -> Annotation {
    let start_line = block.first().map(|l| l.number).unwrap_or_default();
    let end_line = block.last().map(|l| l.number).unwrap_or_default();
    Annotation::DebugBlock {
        start_line,
        end_line,
        lines: block
            .iter()
            .map(|l| format!("{}: {}", l.number, l.text.trim()))
            .collect(),
    }
}
