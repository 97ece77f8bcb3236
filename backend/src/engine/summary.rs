use crate::engine::scanner::SourceLine;
use common::model::tool::Tool;

/// Number of debug blocks a submission needs for the "Achieved" grade.
/// Informational only; fewer blocks never reject a submission.
pub const REQUIRED_DEBUG_BLOCKS: usize = 3;

/// Message shown instead of an empty result list.
pub fn empty_message(tool: Tool) -> String {
    match tool {
        Tool::Comment => "No comments were found in this file.".to_string(),
        Tool::Debug => "No DEBUG code blocks were found. You must include at least three DEBUG \
                        code blocks in your code to meet the requirement."
            .to_string(),
    }
}

/// Completion summary for the debug checker, with suggestions of where more
/// blocks could go when the submission has fewer than required.
pub fn debug_summary(block_count: usize, source: &[SourceLine]) -> String {
    if block_count >= REQUIRED_DEBUG_BLOCKS {
        return format!("You have {} debug blocks. Great job!", block_count);
    }

    let mut suggestions = Vec::new();
    for line in source {
        let trimmed = line.text.trim();
        if trimmed.starts_with("def ") {
            let name = trimmed
                .split_whitespace()
                .nth(1)
                .and_then(|word| word.split('(').next())
                .unwrap_or_default();
            if !name.is_empty() {
                suggestions.push(format!(
                    "Add a debug block in the function: {} (line {})",
                    name, line.number
                ));
            }
        }
        if line.text.contains("main") && line.text.contains("if") && line.text.contains("__name__")
        {
            suggestions.push(format!(
                "Add a debug block in the main program section (line {})",
                line.number
            ));
        }
    }
    if suggestions.is_empty() {
        suggestions
            .push("Consider adding debug blocks where you fixed bugs or handled errors.".to_string());
    }

    format!(
        "Only {} debug block(s) found. Try to add at least {} for Achieved.\nSuggestions: {}",
        block_count,
        REQUIRED_DEBUG_BLOCKS,
        suggestions.join("; ")
    )
}
