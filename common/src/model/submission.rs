use crate::model::tool::Tool;
use serde::{Deserialize, Serialize};

/// Outcome of a submit or extract call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckStatus {
    Scored,
    /// A student repeated a submission; the stored results are replayed.
    AlreadyChecked,
    /// Nothing matched the tool's extraction policy. Not an error.
    NoAnnotations,
}

/// A display-ready result line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRow {
    /// `"12"` for a single line, `"3-5"` for a debug block range.
    pub location: String,
    pub annotation: String,
    pub verdict: String,
    pub feedback: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResponse {
    pub status: CheckStatus,
    pub tool: Tool,
    pub filename: String,
    pub fingerprint: String,
    pub message: String,
    pub results: Vec<ResultRow>,
    /// Debug checker completion summary; informational only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UploadStatus {
    Ready,
    AlreadyChecked,
}

/// Response to the staging step of an upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedUpload {
    pub status: UploadStatus,
    /// Draft token to pass to the extract call; absent when already checked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub filename: String,
    pub message: String,
    pub results: Vec<ResultRow>,
}
