use rusqlite::ErrorCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The (user, tool, filename, fingerprint) key already has a check record.
    #[error("a check is already recorded for this submission")]
    Conflict,
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("corrupted row: {0}")]
    Corrupt(String),
}

/// Turns a unique-key violation on insert into [`StoreError::Conflict`].
pub(crate) fn map_insert_error(err: rusqlite::Error) -> StoreError {
    match err.sqlite_error_code() {
        Some(ErrorCode::ConstraintViolation) => StoreError::Conflict,
        _ => StoreError::Database(err),
    }
}
