//! Administrative endpoints. Teacher only.
//!
//! - `POST /api/admin/reset/{user_id}[?tool=comment|debug]`: deletes the user's
//!   check records and stored feedback, for one tool or both, so they can
//!   check their files again. The attempt log is kept.

use actix_web::web::{post, scope};
use actix_web::Scope;

mod reset;

const API_PATH: &str = "/api/admin";

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("/reset/{user_id}", post().to(reset::process))
}
