use serde::{Deserialize, Serialize};

pub const URL_ONLY_MESSAGE: &str =
    "This comment appears to be a pasted URL. Comments should explain your code, not just link to resources.";
pub const COMMENTED_OUT_CODE_MESSAGE: &str = "This comment is just a commented-out line of code. Good comments should explain why the code is there or what it does, not just repeat the code.";
pub const TOO_SHORT_MESSAGE: &str =
    "This comment is too short or vague. Try to be more descriptive and explain the purpose of the code.";
pub const CLEAR_MESSAGE: &str = "This comment is clear and descriptive. Well done!";
pub const COMPLETE_MESSAGE: &str = "Great! Your DEBUG block is complete.";

/// One of the three parts a complete debug block documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DebugPart {
    Test,
    Issue,
    Fix,
}

impl DebugPart {
    /// Reporting order is fixed regardless of detection order.
    pub const ALL: [DebugPart; 3] = [DebugPart::Test, DebugPart::Issue, DebugPart::Fix];

    pub fn label(&self) -> &'static str {
        match self {
            DebugPart::Test => "TEST",
            DebugPart::Issue => "ISSUE",
            DebugPart::Fix => "FIX",
        }
    }

    /// Lowercase keyword searched for in the block text.
    pub fn keyword(&self) -> &'static str {
        match self {
            DebugPart::Test => "test",
            DebugPart::Issue => "issue",
            DebugPart::Fix => "fix",
        }
    }
}

/// Classification attached to exactly one annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "kebab-case")]
pub enum Verdict {
    UrlOnly,
    CommentedOutCode,
    TooShort,
    Clear,
    Complete,
    Incomplete { missing: Vec<DebugPart> },
}

impl Verdict {
    /// Slug stored in the `verdict` column.
    pub fn category(&self) -> &'static str {
        match self {
            Verdict::UrlOnly => "url-only",
            Verdict::CommentedOutCode => "commented-out-code",
            Verdict::TooShort => "too-short",
            Verdict::Clear => "clear",
            Verdict::Complete => "complete",
            Verdict::Incomplete { .. } => "incomplete",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Verdict::UrlOnly => URL_ONLY_MESSAGE.to_string(),
            Verdict::CommentedOutCode => COMMENTED_OUT_CODE_MESSAGE.to_string(),
            Verdict::TooShort => TOO_SHORT_MESSAGE.to_string(),
            Verdict::Clear => CLEAR_MESSAGE.to_string(),
            Verdict::Complete => COMPLETE_MESSAGE.to_string(),
            Verdict::Incomplete { missing } => {
                let labels: Vec<&str> = missing.iter().map(DebugPart::label).collect();
                format!(
                    "Add a {} to your DEBUG block for full marks.",
                    labels.join(", ")
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn incomplete_message_lists_missing_parts() {
        let verdict = Verdict::Incomplete {
            missing: vec![DebugPart::Issue, DebugPart::Fix],
        };
        assert_eq!(
            verdict.message(),
            "Add a ISSUE, FIX to your DEBUG block for full marks."
        );
        assert_eq!(verdict.category(), "incomplete");
    }

    #[rstest]
    #[case(Verdict::UrlOnly, "url-only")]
    #[case(Verdict::CommentedOutCode, "commented-out-code")]
    #[case(Verdict::TooShort, "too-short")]
    #[case(Verdict::Clear, "clear")]
    #[case(Verdict::Complete, "complete")]
    fn category_matches_serde_tag(#[case] verdict: Verdict, #[case] slug: &str) {
        assert_eq!(verdict.category(), slug);
        let json = serde_json::to_value(&verdict).expect("serialize verdict");
        assert_eq!(json["category"], slug);
    }
}
