//! # Annotation Feedback Engine
//!
//! Pure, stateless scoring of a source submission. The pipeline is
//!
//! 1. `scanner`: normalize line endings and number the lines.
//! 2. `extract`: pick the annotations the selected tool cares about.
//! 3. `classify`: attach exactly one verdict to every annotation.
//!
//! Both checkers run through the same [`score`] entry point and differ only in
//! the [`AnnotationPolicy`] they use. Nothing in this module performs I/O or
//! fails; any text is a valid input.

pub mod classify;
pub mod extract;
pub mod fingerprint;
pub mod scanner;
pub mod summary;

use crate::engine::scanner::{scan, SourceLine};
use common::model::annotation::Annotation;
use common::model::tool::Tool;
use common::model::verdict::Verdict;
use log::debug;

/// An annotation together with its verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredAnnotation {
    pub annotation: Annotation,
    pub verdict: Verdict,
}

/// Extraction and classification rules of one checker.
pub trait AnnotationPolicy: Sync {
    fn tool(&self) -> Tool;
    fn extract(&self, lines: &[SourceLine]) -> Vec<Annotation>;
    fn classify(&self, annotation: &Annotation) -> Verdict;
}

pub struct CommentPolicy;

impl AnnotationPolicy for CommentPolicy {
    fn tool(&self) -> Tool {
        Tool::Comment
    }

    fn extract(&self, lines: &[SourceLine]) -> Vec<Annotation> {
        extract::extract_comments(lines)
    }

    fn classify(&self, annotation: &Annotation) -> Verdict {
        classify::classify_comment(&annotation.text())
    }
}

pub struct DebugPolicy;

impl AnnotationPolicy for DebugPolicy {
    fn tool(&self) -> Tool {
        Tool::Debug
    }

    fn extract(&self, lines: &[SourceLine]) -> Vec<Annotation> {
        extract::extract_debug_blocks(lines)
    }

    fn classify(&self, annotation: &Annotation) -> Verdict {
        match annotation {
            Annotation::DebugBlock { lines, .. } => classify::classify_debug_block(lines),
            Annotation::Comment { text, .. } => {
                classify::classify_debug_block(std::slice::from_ref(text))
            }
        }
    }
}

pub fn policy_for(tool: Tool) -> &'static dyn AnnotationPolicy {
    match tool {
        Tool::Comment => &CommentPolicy,
        Tool::Debug => &DebugPolicy,
    }
}

/// Runs the whole pipeline for `tool`. Results are in ascending line order.
pub fn score(tool: Tool, text: &str) -> Vec<ScoredAnnotation> {
    score_lines(tool, &scan(text))
}

pub fn score_lines(tool: Tool, lines: &[SourceLine]) -> Vec<ScoredAnnotation> {
    let policy = policy_for(tool);
    let annotations = policy.extract(lines);
    debug!(
        "{} policy extracted {} annotation(s) from {} line(s)",
        policy.tool(),
        annotations.len(),
        lines.len()
    );
    annotations
        .into_iter()
        .map(|annotation| {
            let verdict = policy.classify(&annotation);
            ScoredAnnotation {
                annotation,
                verdict,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const SAMPLE: &str = "\
# Camp details stored in a dictionary\r
CAMPS = {}\r
\r
# DEBUG TEST: entered bad input\r
# DEBUG ISSUE: crashed\r
# DEBUG FIX: added validation\r
x = 10  # set x to 10\r
# DEBUG: tried X\r
";

    #[rstest]
    fn comment_tool_scores_every_comment_in_order() {
        let scored = score(Tool::Comment, SAMPLE);
        let lines: Vec<usize> = scored.iter().map(|s| s.annotation.first_line()).collect();
        assert_eq!(lines, vec![1, 4, 5, 6, 7, 8]);
        assert_eq!(scored[0].verdict, Verdict::Clear);
        assert_eq!(scored[4].verdict, Verdict::TooShort);
    }

    #[rstest]
    fn debug_tool_scores_blocks() {
        let scored = score(Tool::Debug, SAMPLE);
        assert_eq!(scored.len(), 2);
        assert_eq!(scored[0].verdict, Verdict::Complete);
        assert_eq!(
            (scored[1].annotation.first_line(), scored[1].annotation.last_line()),
            (8, 8)
        );
        assert_eq!(scored[1].verdict.category(), "incomplete");
    }

    #[rstest]
    #[case(Tool::Comment)]
    #[case(Tool::Debug)]
    fn policy_matches_tool(#[case] tool: Tool) {
        assert_eq!(policy_for(tool).tool(), tool);
    }

    #[rstest]
    fn empty_text_scores_nothing() {
        assert!(score(Tool::Comment, "").is_empty());
        assert!(score(Tool::Debug, "print('hi')\n").is_empty());
    }
}
