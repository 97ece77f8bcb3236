use serde::{Deserialize, Serialize};

/// The three facts the engine reads from the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    pub username: String,
    /// Teachers are exempt from the one-attempt restriction.
    pub is_teacher: bool,
}
