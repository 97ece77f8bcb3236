//! Ordered heuristic rules. The first matching rule wins, so the order of the
//! checks below is part of the behaviour.

use common::model::verdict::{DebugPart, Verdict};

/// Comments shorter than this (in characters) are considered vague.
pub const MIN_COMMENT_CHARS: usize = 15;

pub fn classify_comment(text: &str) -> Verdict {
    let text = text.trim();
    if text.contains("http") || text.contains("www.") {
        Verdict::UrlOnly
    } else if text.contains("print(") {
        Verdict::CommentedOutCode
    } else if text.chars().count() < MIN_COMMENT_CHARS {
        Verdict::TooShort
    } else {
        Verdict::Clear
    }
}

/// Looks for the test, issue and fix keywords anywhere in the block,
/// ignoring case.
pub fn classify_debug_block(lines: &[String]) -> Verdict {
    let block = lines.join("\n").to_lowercase();
    let missing: Vec<DebugPart> = DebugPart::ALL
        .into_iter()
        .filter(|part| !block.contains(part.keyword()))
        .collect();

    if missing.is_empty() {
        Verdict::Complete
    } else {
        Verdict::Incomplete { missing }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("# see https://example.com for details", Verdict::UrlOnly)]
    #[case("# www.python.org", Verdict::UrlOnly)]
    #[case("# print(total)", Verdict::CommentedOutCode)]
    #[case("# set x to 10", Verdict::TooShort)]
    #[case("# loop", Verdict::TooShort)]
    #[case("# Calculate the total cost including the shuttle", Verdict::Clear)]
    fn classifies_comments(#[case] text: &str, #[case] expected: Verdict) {
        assert_eq!(classify_comment(text), expected);
    }

    #[rstest]
    fn url_rule_precedes_length_rule() {
        let text = "# http://a.b";
        assert!(text.chars().count() < MIN_COMMENT_CHARS);
        assert_eq!(classify_comment(text), Verdict::UrlOnly);
    }

    #[rstest]
    fn url_rule_precedes_code_rule() {
        assert_eq!(
            classify_comment("# print('http://example.com')"),
            Verdict::UrlOnly
        );
    }

    #[rstest]
    fn length_counts_characters_not_bytes() {
        // 15 characters, more than 15 bytes.
        assert_eq!(classify_comment("# café résumé!!"), Verdict::Clear);
    }

    #[rstest]
    fn classification_is_repeatable() {
        let text = "# adds the shuttle fee to every booking";
        assert_eq!(classify_comment(text), classify_comment(text));
    }

    #[rstest]
    fn full_block_is_complete() {
        let lines = vec![
            "1: # DEBUG TEST: entered bad input".to_string(),
            "2: # DEBUG ISSUE: crashed".to_string(),
            "3: # DEBUG FIX: added validation".to_string(),
        ];
        assert_eq!(classify_debug_block(&lines), Verdict::Complete);
    }

    #[rstest]
    fn bare_block_misses_everything_in_fixed_order() {
        let verdict = classify_debug_block(&["4: # DEBUG: tried X".to_string()]);
        assert_eq!(
            verdict,
            Verdict::Incomplete {
                missing: vec![DebugPart::Test, DebugPart::Issue, DebugPart::Fix]
            }
        );
        assert_eq!(
            verdict.message(),
            "Add a TEST, ISSUE, FIX to your DEBUG block for full marks."
        );
    }

    #[rstest]
    fn reports_only_what_is_missing() {
        let lines = vec![
            "7: # debug fix: wrapped input".to_string(),
            "8: # Debug Test: typed letters".to_string(),
        ];
        assert_eq!(
            classify_debug_block(&lines),
            Verdict::Incomplete {
                missing: vec![DebugPart::Issue]
            }
        );
    }
}
