use crate::error::CheckError;
use crate::identity::CurrentUser;
use crate::storage::Store;
use actix_web::{web, HttpResponse};
use common::requests::ResetQuery;
use log::info;

pub async fn process(
    user_id: web::Path<i64>,
    user: CurrentUser,
    store: web::Data<Store>,
    query: web::Query<ResetQuery>,
) -> Result<HttpResponse, CheckError> {
    let admin = user.into_inner();
    if !admin.is_teacher {
        return Err(CheckError::Forbidden(
            "You must be a teacher to reset check history.".into(),
        ));
    }
    let user_id = user_id.into_inner();
    let tool = query.into_inner().tool;
    info!(
        "teacher {} resetting {} history of user {}",
        admin.id,
        tool.map(|t| t.as_str()).unwrap_or("all"),
        user_id
    );

    let store = store.get_ref().clone();
    let summary = tokio::task::spawn_blocking(move || store.reset_user(user_id, tool)).await??;
    Ok(HttpResponse::Ok().json(summary))
}
