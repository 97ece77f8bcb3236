use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two practice checkers that share the feedback engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Scores trailing `#` comments line by line.
    Comment,
    /// Scores contiguous `# DEBUG` blocks.
    Debug,
}

impl Tool {
    /// Stable identifier used in URLs and in the database `tool` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tool::Comment => "comment",
            Tool::Debug => "debug",
        }
    }

    /// Human readable name shown in exported documents.
    pub fn display_name(&self) -> &'static str {
        match self {
            Tool::Comment => "Comment Checker",
            Tool::Debug => "Debug Checker",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "comment" => Ok(Tool::Comment),
            "debug" => Ok(Tool::Debug),
            other => Err(format!("unknown checker tool '{}'", other)),
        }
    }
}
