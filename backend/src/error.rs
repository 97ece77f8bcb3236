use crate::storage::StoreError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::error;
use thiserror::Error;

/// Failures surfaced to HTTP callers.
///
/// The engine itself never fails; these come from input validation, the
/// identity headers, storage and rendering.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("PDF generation failed: {0}")]
    Render(String),
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ResponseError for CheckError {
    fn status_code(&self) -> StatusCode {
        match self {
            CheckError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            CheckError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            CheckError::Forbidden(_) => StatusCode::FORBIDDEN,
            CheckError::NotFound(_) => StatusCode::NOT_FOUND,
            CheckError::Store(_) | CheckError::Task(_) => StatusCode::SERVICE_UNAVAILABLE,
            CheckError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            // Do not leak storage details to clients.
            CheckError::Store(_) | CheckError::Task(_) => {
                error!("check request failed: {}", self);
                HttpResponse::build(self.status_code())
                    .body("The check could not be completed. Please try again.")
            }
            CheckError::Render(_) => {
                error!("{}", self);
                HttpResponse::build(self.status_code()).body(self.to_string())
            }
            _ => HttpResponse::build(self.status_code()).body(self.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use rstest::rstest;

    #[rstest]
    #[case(CheckError::InvalidInput("Missing file".into()), StatusCode::BAD_REQUEST)]
    #[case(CheckError::Unauthorized("who?".into()), StatusCode::UNAUTHORIZED)]
    #[case(CheckError::Forbidden("no".into()), StatusCode::FORBIDDEN)]
    #[case(CheckError::NotFound("gone".into()), StatusCode::NOT_FOUND)]
    #[case(CheckError::Store(StoreError::Conflict), StatusCode::SERVICE_UNAVAILABLE)]
    fn maps_status_codes(#[case] err: CheckError, #[case] status: StatusCode) {
        assert_eq!(err.status_code(), status);
    }

    #[actix_web::test]
    async fn storage_errors_ask_to_try_again() {
        let err = CheckError::Store(StoreError::Corrupt("bad tool".into()));
        let body = to_bytes(err.error_response().into_body())
            .await
            .expect("body");
        assert_eq!(body, "The check could not be completed. Please try again.");
    }
}
