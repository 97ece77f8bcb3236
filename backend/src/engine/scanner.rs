/// A line of submitted source together with its 1-based position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    pub number: usize,
    pub text: String,
}

/// Collapses CRLF and lone CR line endings into LF.
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Splits `text` into numbered lines.
///
/// Endings are normalized first, so numbering is identical for CRLF, CR and LF
/// input. Blank lines are kept; a single trailing newline does not produce an
/// extra empty line.
pub fn scan(text: &str) -> Vec<SourceLine> {
    normalize_line_endings(text)
        .lines()
        .enumerate()
        .map(|(idx, line)| SourceLine {
            number: idx + 1,
            text: line.to_string(),
        })
        .collect()
}
