use crate::error::CheckError;
use crate::identity::CurrentUser;
use crate::storage::Store;
use actix_web::{web, HttpResponse};

/// The caller's checked files with a flag per tool.
pub async fn process(
    user: CurrentUser,
    store: web::Data<Store>,
) -> Result<HttpResponse, CheckError> {
    let user_id = user.into_inner().id;
    let store = store.get_ref().clone();

    let files = tokio::task::spawn_blocking(move || store.checked_files(user_id)).await??;
    Ok(HttpResponse::Ok().json(files))
}
