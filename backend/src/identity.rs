//! Reads the caller's identity from headers set by the upstream identity
//! provider. Only the id, the username and the teacher flag are used.

use crate::error::CheckError;
use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use common::model::user::Identity;
use futures_util::future::{ready, Ready};

pub const USER_ID_HEADER: &str = "X-User-Id";
pub const USERNAME_HEADER: &str = "X-Username";
pub const ROLE_HEADER: &str = "X-User-Role";

/// Extractor for the authenticated caller; responds `401` when absent.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

impl CurrentUser {
    pub fn into_inner(self) -> Identity {
        self.0
    }
}

fn header<'a>(req: &'a HttpRequest, name: &str) -> Result<&'a str, CheckError> {
    req.headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| CheckError::Unauthorized(format!("Missing {} header", name)))
}

fn identity_from_request(req: &HttpRequest) -> Result<CurrentUser, CheckError> {
    let id = header(req, USER_ID_HEADER)?
        .parse::<i64>()
        .map_err(|_| CheckError::Unauthorized(format!("Invalid {} header", USER_ID_HEADER)))?;
    let username = header(req, USERNAME_HEADER)?.to_string();
    let is_teacher = match header(req, ROLE_HEADER)?.to_ascii_lowercase().as_str() {
        "teacher" => true,
        "student" => false,
        other => {
            return Err(CheckError::Unauthorized(format!("Unknown role '{}'", other)));
        }
    };

    Ok(CurrentUser(Identity {
        id,
        username,
        is_teacher,
    }))
}

impl FromRequest for CurrentUser {
    type Error = CheckError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(identity_from_request(req))
    }
}
