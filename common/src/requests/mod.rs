use crate::model::tool::Tool;
use serde::{Deserialize, Serialize};

/// Payload of the paste-box submission endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub filename: String,
    pub text: String,
}

/// Commits a draft staged by an upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractRequest {
    pub token: String,
}

/// Query string of the results and PDF export endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileQuery {
    pub filename: String,
}

/// Optional tool filter of the history reset; both tools when absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResetQuery {
    pub tool: Option<Tool>,
}
