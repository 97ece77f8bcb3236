//! Data model shared between the feedback backend and its clients.
//!
//! Everything here is plain serde data: the checker tools, the caller's
//! identity, extracted annotations, their verdicts, persisted check rows and
//! the request/response payloads of the HTTP API.

pub mod model;
pub mod requests;
