//! HTTP API for the comment and debug checkers.
//!
//! `{tool}` is `comment` or `debug`; anything else is a `404`. Every route
//! needs the identity headers read by [`crate::identity::CurrentUser`].
//!
//! - `POST /api/checks/{tool}/submit`: JSON `{filename, text}`; scores in one
//!   step and returns a `CheckResponse`.
//! - `POST /api/checks/{tool}/upload`: multipart with a `file` part; stages the
//!   decoded text and returns a `StagedUpload` with a draft token. Nothing is
//!   scored yet. A student who already checked the same content gets the
//!   stored results and no token.
//! - `POST /api/checks/{tool}/extract`: JSON `{token}`; scores a staged upload.
//! - `GET /api/checks/{tool}/results?filename=`: the latest stored result.
//! - `GET /api/checks/{tool}/pdf?filename=`: the same result as a PDF download.
//! - `GET /api/checks/history`: files the caller has checked, per tool.

use actix_web::web::{get, post, scope};
use actix_web::Scope;

mod extract;
mod history;
mod pdf;
mod results;
pub mod service;
mod submit;
mod upload;

const API_PATH: &str = "/api/checks";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/history", get().to(history::process))
        .route("/{tool}/submit", post().to(submit::process))
        .route("/{tool}/upload", post().to(upload::process))
        .route("/{tool}/extract", post().to(extract::process))
        .route("/{tool}/results", get().to(results::process))
        .route("/{tool}/pdf", get().to(pdf::process))
}
